//! Monitoring stack control port.

use async_trait::async_trait;

use crate::error::StackError;

/// Start/stop handle for the local monitoring stack.
///
/// The production implementation shells out to the deploy scripts the dev
/// environment provides; tests substitute a recording implementation.
#[async_trait]
pub trait StackController: Send + Sync {
    /// Bring the stack up. Returning does not imply readiness; callers probe
    /// the dashboard separately.
    async fn start(&self) -> Result<(), StackError>;

    /// Tear the stack down.
    async fn stop(&self) -> Result<(), StackError>;
}
