//! Monitoring stack supervision.
//!
//! Brings the local stack up when the dashboard port is not already serving,
//! and remembers whether this run owns it so cleanup never stops a stack
//! somebody else started.

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::ports::StackController;
use crate::probe::Prober;

/// Outcome of ensuring the stack is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackHandle {
    started_here: bool,
}

impl StackHandle {
    /// Whether this run issued the start command.
    pub fn started_here(&self) -> bool {
        self.started_here
    }
}

pub struct StackSupervisor<'a, S: StackController + ?Sized> {
    stack: &'a S,
    prober: &'a Prober,
    dashboard_url: &'a str,
}

impl<'a, S: StackController + ?Sized> StackSupervisor<'a, S> {
    pub fn new(stack: &'a S, prober: &'a Prober, dashboard_url: &'a str) -> Self {
        Self {
            stack,
            prober,
            dashboard_url,
        }
    }

    /// Make sure the stack is serving on the dashboard port.
    ///
    /// Idempotent: an already-serving stack is left alone and stays under
    /// external ownership. Otherwise the start command runs and the dashboard
    /// is probed with the full retry budget; exhaustion is fatal.
    pub async fn ensure_running(&self) -> Result<StackHandle> {
        if self.prober.check_once(self.dashboard_url).await {
            info!(
                dashboard = self.dashboard_url,
                "monitoring stack already running"
            );
            return Ok(StackHandle {
                started_here: false,
            });
        }

        info!(dashboard = self.dashboard_url, "starting monitoring stack");
        self.stack.start().await?;
        self.prober.wait_until_reachable(self.dashboard_url).await?;
        info!("monitoring stack ready");

        Ok(StackHandle { started_here: true })
    }

    /// Stop the stack if this run started it. Stop failures are logged,
    /// shutdown continues regardless.
    pub async fn teardown(&self, handle: StackHandle) {
        if !handle.started_here {
            debug!("monitoring stack not started here, leaving it running");
            return;
        }

        info!("stopping monitoring stack");
        if let Err(error) = self.stack.stop().await {
            warn!(%error, "failed to stop monitoring stack");
        }
    }
}
