//! xcart-launch - Supervised launcher for the xcart API with metrics export.
//!
//! This crate runs the xcart e-commerce API as a child process with its
//! OpenTelemetry export environment wired up, bringing a local SigNoz
//! monitoring stack along when the endpoint is local.
//!
//! # Architecture
//!
//! - [`probe`] - HTTP readiness probing with a fixed-delay retry budget
//! - [`supervisor`] - brings up the local monitoring stack when needed and
//!   tracks whether this run owns it
//! - [`service`] - spawns the API server with the OTLP export environment
//! - [`orchestrator`] - sequences the above and tears everything down on
//!   shutdown, service first
//!
//! Collaborators that reach outside the process (the stack start/stop
//! scripts) sit behind the [`ports`] traits with shell implementations in
//! [`adapters`], so tests can substitute them.
//!
//! # Modules
//!
//! - [`cli`] - Command-line surface
//! - [`config`] - Configuration loading from TOML files with env overrides
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use xcart_launch::config::Config;
//! use xcart_launch::orchestrator::Orchestrator;
//!
//! # async fn run() -> xcart_launch::error::Result<()> {
//! let config = Config::default();
//! Orchestrator::from_config(config).run().await
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod ports;
pub mod probe;
pub mod service;
pub mod supervisor;
