//! Observable phases of a user-triggered asynchronous action.
//!
//! A tracker is idle, in flight, or failed with a message waiting to be
//! dismissed. A second trigger while in flight is refused.

use std::future::Future;

use tokio::sync::watch;

use dishhub_core::error::AppError;
use dishhub_core::result::AppResult;

/// Phase of one tracked action.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OperationPhase {
    #[default]
    Idle,
    InFlight,
    /// Settled with an error; holds the message to show.
    Failed(String),
}

/// Tracks one action (an upload button, a like button) across calls.
#[derive(Debug)]
pub struct OperationTracker {
    phase: watch::Sender<OperationPhase>,
}

impl OperationTracker {
    pub fn new() -> Self {
        let (phase, _) = watch::channel(OperationPhase::Idle);
        Self { phase }
    }

    pub fn subscribe(&self) -> watch::Receiver<OperationPhase> {
        self.phase.subscribe()
    }

    pub fn phase(&self) -> OperationPhase {
        self.phase.borrow().clone()
    }

    /// Whether the triggering control should be disabled.
    pub fn is_busy(&self) -> bool {
        *self.phase.borrow() == OperationPhase::InFlight
    }

    /// Run `action`, publishing in-flight then idle or failed.
    pub async fn track<T, F>(&self, action: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        let started = self.phase.send_if_modified(|phase| {
            if *phase == OperationPhase::InFlight {
                false
            } else {
                *phase = OperationPhase::InFlight;
                true
            }
        });
        if !started {
            return Err(AppError::validation("This action is already in progress"));
        }

        let result = action.await;
        let settled = match &result {
            Ok(_) => OperationPhase::Idle,
            Err(e) => OperationPhase::Failed(e.message.clone()),
        };
        self.phase.send_replace(settled);
        result
    }

    /// Clear a failure message and return to idle.
    pub fn dismiss(&self) {
        self.phase.send_if_modified(|phase| {
            if matches!(phase, OperationPhase::Failed(_)) {
                *phase = OperationPhase::Idle;
                true
            } else {
                false
            }
        });
    }
}

impl Default for OperationTracker {
    fn default() -> Self {
        Self::new()
    }
}
