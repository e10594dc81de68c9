//! Service child process launching.
//!
//! Builds the telemetry export environment and starts the API server as a
//! background child, returning its handle immediately.

use tokio::process::{Child, Command};
use tracing::info;

use crate::config::{ExportConfig, ServiceConfig};
use crate::error::ServiceError;

pub const OTEL_RESOURCE_ATTRIBUTES: &str = "OTEL_RESOURCE_ATTRIBUTES";
pub const OTEL_EXPORTER_OTLP_ENDPOINT: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";
pub const OTEL_EXPORTER_OTLP_HEADERS: &str = "OTEL_EXPORTER_OTLP_HEADERS";

/// Environment exported to the service child for metrics export.
///
/// The headers variable is only present when an access token is configured;
/// a local collector takes unauthenticated OTLP.
pub fn telemetry_env(export: &ExportConfig) -> Vec<(String, String)> {
    let mut env = vec![
        (
            OTEL_RESOURCE_ATTRIBUTES.to_string(),
            export.resource_attributes.clone(),
        ),
        (
            OTEL_EXPORTER_OTLP_ENDPOINT.to_string(),
            export.endpoint.clone(),
        ),
    ];

    if let Some(ref token) = export.access_token {
        env.push((
            OTEL_EXPORTER_OTLP_HEADERS.to_string(),
            format!("signoz-access-token={token}"),
        ));
    }

    env
}

pub struct ServiceLauncher {
    service: ServiceConfig,
    export: ExportConfig,
}

impl ServiceLauncher {
    pub fn new(service: ServiceConfig, export: ExportConfig) -> Self {
        Self { service, export }
    }

    /// Spawn the API server, returning its handle without waiting.
    ///
    /// The child is killed on drop so an orchestrator error path cannot
    /// leak it.
    pub fn spawn(&self) -> Result<Child, ServiceError> {
        let (program, args) = self
            .service
            .command
            .split_first()
            .ok_or(ServiceError::EmptyCommand)?;
        let command_display = self.service.command.join(" ");

        let mut command = Command::new(program);
        command
            .args(args)
            .arg("--port")
            .arg(self.service.port.to_string());
        if self.service.reload {
            command.arg("--reload");
        }
        command.envs(telemetry_env(&self.export));
        command.kill_on_drop(true);

        info!(
            command = %command_display,
            port = self.service.port,
            endpoint = %self.export.endpoint,
            "launching service"
        );

        command.spawn().map_err(|source| ServiceError::Spawn {
            command: command_display,
            source,
        })
    }
}
