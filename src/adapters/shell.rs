//! Shell-command stack controller.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use crate::config::StackConfig;
use crate::error::StackError;
use crate::ports::StackController;

/// Runs the configured start/stop argv as external commands.
pub struct ShellStack {
    start_command: Vec<String>,
    stop_command: Vec<String>,
}

impl ShellStack {
    pub fn from_config(config: &StackConfig) -> Self {
        Self {
            start_command: config.start_command.clone(),
            stop_command: config.stop_command.clone(),
        }
    }

    async fn run(argv: &[String]) -> Result<(), StackError> {
        let (program, args) = argv.split_first().ok_or(StackError::EmptyCommand)?;
        let command = argv.join(" ");

        info!(%command, "running stack command");
        let status = Command::new(program)
            .args(args)
            .status()
            .await
            .map_err(|source| StackError::Io {
                command: command.clone(),
                source,
            })?;

        if !status.success() {
            return Err(StackError::Failed { command, status });
        }
        Ok(())
    }
}

#[async_trait]
impl StackController for ShellStack {
    async fn start(&self) -> Result<(), StackError> {
        Self::run(&self.start_command).await
    }

    async fn stop(&self) -> Result<(), StackError> {
        Self::run(&self.stop_command).await
    }
}
