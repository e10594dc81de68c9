use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use xcart_launch::error::StackError;
use xcart_launch::ports::StackController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackCall {
    Start,
    Stop,
}

/// Thread-safe call recorder for stack-control assertions in tests.
#[derive(Default)]
pub struct RecordingStack {
    calls: Arc<Mutex<Vec<StackCall>>>,
    on_start: Option<Box<dyn Fn() + Send + Sync>>,
}

impl RecordingStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `hook` when `start` is called, e.g. to bring up a stub dashboard.
    pub fn with_start_hook(hook: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            calls: Arc::default(),
            on_start: Some(Box::new(hook)),
        }
    }

    pub fn calls(&self) -> Vec<StackCall> {
        self.calls.lock().expect("lock stack calls").clone()
    }

    /// Shared view of the call log, usable after the stack moves into an
    /// orchestrator.
    pub fn calls_handle(&self) -> Arc<Mutex<Vec<StackCall>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl StackController for RecordingStack {
    async fn start(&self) -> Result<(), StackError> {
        self.calls
            .lock()
            .expect("lock stack calls")
            .push(StackCall::Start);
        if let Some(ref hook) = self.on_start {
            hook();
        }
        Ok(())
    }

    async fn stop(&self) -> Result<(), StackError> {
        self.calls
            .lock()
            .expect("lock stack calls")
            .push(StackCall::Stop);
        Ok(())
    }
}
