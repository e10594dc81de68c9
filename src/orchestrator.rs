//! Top-level run orchestration.
//!
//! Sequences monitoring-stack readiness, service launch, the running wait,
//! and signal-driven teardown. The monitoring stack is always confirmed
//! ready (or skipped) before the service launches; shutdown always signals
//! the service before the stack is stopped.

use std::time::Duration;

use tokio::process::Child;
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::adapters::ShellStack;
use crate::config::Config;
use crate::error::Result;
use crate::ports::StackController;
use crate::probe::Prober;
use crate::service::ServiceLauncher;
use crate::supervisor::StackSupervisor;

/// Lifecycle phases, in the order they are entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    EnsuringMonitoring,
    Launching,
    Running,
    ShuttingDown,
    Stopped,
}

/// Main application orchestrator.
pub struct Orchestrator<S: StackController> {
    config: Config,
    stack: S,
    phase: Phase,
}

impl Orchestrator<ShellStack> {
    pub fn from_config(config: Config) -> Self {
        let stack = ShellStack::from_config(&config.stack);
        Self::with_stack(config, stack)
    }
}

impl<S: StackController> Orchestrator<S> {
    pub fn with_stack(config: Config, stack: S) -> Self {
        Self {
            config,
            stack,
            phase: Phase::Idle,
        }
    }

    /// Run to completion without external cancellation.
    pub async fn run(self) -> Result<()> {
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        self.run_with_shutdown(shutdown_rx).await
    }

    /// Run until the service exits or `shutdown` flips to true, then tear
    /// everything down in order: service first, then any stack this run
    /// started.
    pub async fn run_with_shutdown(mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let prober = Prober::from_config(&self.config.probe);

        let stack_handle = if self.config.export.is_local() {
            self.transition(Phase::EnsuringMonitoring);
            let supervisor =
                StackSupervisor::new(&self.stack, &prober, &self.config.stack.dashboard_url);
            Some(supervisor.ensure_running().await?)
        } else {
            info!(
                endpoint = %self.config.export.endpoint,
                "remote endpoint, skipping local monitoring stack"
            );
            None
        };

        self.transition(Phase::Launching);
        let launcher =
            ServiceLauncher::new(self.config.service.clone(), self.config.export.clone());
        let mut child = launcher.spawn()?;

        self.transition(Phase::Running);
        let mut child_exited = false;
        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    match changed {
                        Ok(()) if !*shutdown.borrow() => continue,
                        Ok(()) => info!("shutdown requested"),
                        Err(_) => info!("shutdown channel closed"),
                    }
                    break;
                }
                status = child.wait() => {
                    match status {
                        Ok(status) => info!(%status, "service exited on its own"),
                        Err(error) => warn!(%error, "failed waiting on service"),
                    }
                    child_exited = true;
                    break;
                }
            }
        }

        self.transition(Phase::ShuttingDown);
        if !child_exited {
            let grace = Duration::from_secs(self.config.shutdown.grace_period_secs);
            terminate_child(&mut child, grace).await;
        }
        if let Some(handle) = stack_handle {
            let supervisor =
                StackSupervisor::new(&self.stack, &prober, &self.config.stack.dashboard_url);
            supervisor.teardown(handle).await;
        }

        self.transition(Phase::Stopped);
        Ok(())
    }

    fn transition(&mut self, next: Phase) {
        debug!(from = ?self.phase, to = ?next, "phase transition");
        self.phase = next;
    }
}

/// Ask the child to stop, escalating to a hard kill after the grace period.
///
/// A child that outlives the grace period is logged, never escalated; the
/// rest of the shutdown proceeds.
async fn terminate_child(child: &mut Child, grace: Duration) {
    request_termination(child);

    match timeout(grace, child.wait()).await {
        Ok(Ok(status)) => info!(%status, "service stopped"),
        Ok(Err(error)) => warn!(%error, "failed waiting on service"),
        Err(_) => {
            warn!(
                grace_secs = grace.as_secs(),
                "service did not stop within grace period, killing"
            );
            if let Err(error) = child.kill().await {
                warn!(%error, "failed to kill service");
            }
        }
    }
}

// SIGTERM first so the server can close its sockets.
#[cfg(unix)]
fn request_termination(child: &mut Child) {
    match child.id() {
        Some(pid) => unsafe {
            libc::kill(pid as libc::pid_t, libc::SIGTERM);
        },
        None => debug!("service already reaped"),
    }
}

#[cfg(not(unix))]
fn request_termination(child: &mut Child) {
    if let Err(error) = child.start_kill() {
        warn!(%error, "failed to signal service");
    }
}
