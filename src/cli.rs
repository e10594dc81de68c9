//! Command-line interface definitions.

use clap::Parser;
use std::path::PathBuf;

/// Run the xcart API with metrics export wired to a monitoring stack.
#[derive(Parser, Debug)]
#[command(name = "xcart-launch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// OTLP endpoint to export metrics to [default: http://localhost:4317]
    pub endpoint: Option<String>,

    /// Ingestion access token, exported to the service as an OTLP header
    pub access_token: Option<String>,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,
}
