//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file with environment variable overrides
//! for sensitive values like `SIGNOZ_ACCESS_TOKEN`. Positional CLI arguments
//! take precedence over both.

use serde::Deserialize;
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

use crate::cli::Cli;
use crate::error::{ConfigError, Result};

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub stack: StackConfig,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub shutdown: ShutdownConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the service exports its telemetry.
/// The access token is loaded from `SIGNOZ_ACCESS_TOKEN` at runtime
/// (never from the config file).
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// OTLP endpoint the service exports metrics to.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Resource attributes identifying the service to the backend.
    #[serde(default = "default_resource_attributes")]
    pub resource_attributes: String,
    /// Ingestion access token loaded from `SIGNOZ_ACCESS_TOKEN` at runtime.
    #[serde(skip)]
    pub access_token: Option<String>,
}

fn default_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_resource_attributes() -> String {
    "service.name=xcart".to_string()
}

impl ExportConfig {
    /// Whether the endpoint targets a stack on this machine.
    ///
    /// A substring check, matching what the exporter itself uses to decide
    /// between insecure and TLS transport. Non-local endpoints are assumed
    /// externally managed.
    pub fn is_local(&self) -> bool {
        self.endpoint.contains("localhost")
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            resource_attributes: default_resource_attributes(),
            access_token: None,
        }
    }
}

/// Local monitoring stack: dashboard address plus the start/stop commands
/// provided by the dev environment.
#[derive(Debug, Clone, Deserialize)]
pub struct StackConfig {
    /// Dashboard URL probed to decide whether the stack is already up.
    #[serde(default = "default_dashboard_url")]
    pub dashboard_url: String,
    /// Command that brings the stack up.
    #[serde(default = "default_start_command")]
    pub start_command: Vec<String>,
    /// Command that tears the stack down.
    #[serde(default = "default_stop_command")]
    pub stop_command: Vec<String>,
}

fn default_dashboard_url() -> String {
    "http://localhost:3301".to_string()
}

fn default_start_command() -> Vec<String> {
    vec!["signoz-start".to_string()]
}

fn default_stop_command() -> Vec<String> {
    vec!["signoz-stop".to_string()]
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            dashboard_url: default_dashboard_url(),
            start_command: default_start_command(),
            stop_command: default_stop_command(),
        }
    }
}

/// The API server child process.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Command that starts the API server.
    #[serde(default = "default_service_command")]
    pub command: Vec<String>,
    /// Port the server binds, appended as `--port`.
    #[serde(default = "default_service_port")]
    pub port: u16,
    /// Append `--reload` so the server restarts on code changes.
    #[serde(default = "default_true")]
    pub reload: bool,
}

fn default_service_command() -> Vec<String> {
    vec!["uvicorn".to_string(), "app.main:app".to_string()]
}

const fn default_service_port() -> u16 {
    8000
}

const fn default_true() -> bool {
    true
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            command: default_service_command(),
            port: default_service_port(),
            reload: true,
        }
    }
}

/// Readiness probe budget: fixed delay, no backoff.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay between consecutive attempts, in seconds.
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,
    /// Per-request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_max_attempts() -> u32 {
    30
}

const fn default_delay_secs() -> u64 {
    2
}

const fn default_timeout_secs() -> u64 {
    5
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_secs: default_delay_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Shutdown behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct ShutdownConfig {
    /// How long to wait for the service to exit after SIGTERM before killing it.
    #[serde(default = "default_grace_period_secs")]
    pub grace_period_secs: u64,
}

const fn default_grace_period_secs() -> u64 {
    10
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            grace_period_secs: default_grace_period_secs(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when the file
    /// does not exist so the tool runs without any setup.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        } else {
            Self::default()
        };

        // Load access token from environment variable (never from config file for security)
        config.export.access_token = std::env::var("SIGNOZ_ACCESS_TOKEN").ok();

        config.validate()?;

        Ok(config)
    }

    /// Apply command-line overrides. Positional arguments win over the
    /// environment and the config file.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(ref endpoint) = cli.endpoint {
            self.export.endpoint = endpoint.clone();
        }
        if let Some(ref token) = cli.access_token {
            self.export.access_token = Some(token.clone());
        }
        if let Some(ref level) = cli.log_level {
            self.logging.level = level.clone();
        }
        if cli.json_logs {
            self.logging.format = "json".to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.export.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "endpoint" }.into());
        }
        if let Err(e) = Url::parse(&self.export.endpoint) {
            return Err(ConfigError::InvalidValue {
                field: "endpoint",
                reason: e.to_string(),
            }
            .into());
        }
        if self.probe.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "probe.max_attempts",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        if self.service.command.is_empty() {
            return Err(ConfigError::MissingField {
                field: "service.command",
            }
            .into());
        }
        Ok(())
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}
