//! Fault and latency injection for the in-memory platform.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use dishhub_core::error::PlatformError;
use dishhub_core::result::PlatformResult;

/// A single platform capability call, used to target injected faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformOp {
    CreateAccount,
    CreateSession,
    GetAccount,
    DeleteSession,
    ListDocuments,
    GetDocument,
    CreateDocument,
    UpdateDocument,
    DeleteDocument,
    CreateFile,
    GetFile,
    DeleteFile,
}

/// Queued failures, per-call latency and call counters.
///
/// Every in-memory capability call passes through [`FaultInjector::enter`]
/// before touching state: it is counted, delayed by the configured latency,
/// then fails with the next queued error for that call if there is one.
#[derive(Debug, Default)]
pub struct FaultInjector {
    failures: Mutex<HashMap<PlatformOp, VecDeque<PlatformError>>>,
    latency: Mutex<HashMap<PlatformOp, Duration>>,
    calls: Mutex<HashMap<PlatformOp, u32>>,
}

impl FaultInjector {
    /// Create an injector with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next call of `op` with `error`.
    pub fn fail_next(&self, op: PlatformOp, error: PlatformError) {
        self.fail_times(op, 1, error);
    }

    /// Fail the next `times` calls of `op` with `error`.
    pub fn fail_times(&self, op: PlatformOp, times: usize, error: PlatformError) {
        let mut failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        let queue = failures.entry(op).or_default();
        for _ in 0..times {
            queue.push_back(error.clone());
        }
    }

    /// Delay every call of `op` by `delay`.
    pub fn set_latency(&self, op: PlatformOp, delay: Duration) {
        let mut latency = self.latency.lock().unwrap_or_else(|e| e.into_inner());
        latency.insert(op, delay);
    }

    /// Drop queued failures and latencies. Counters are kept.
    pub fn clear(&self) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        self.latency
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    /// Number of calls of `op` seen so far, failed ones included.
    pub fn call_count(&self, op: PlatformOp) -> u32 {
        let calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
        calls.get(&op).copied().unwrap_or(0)
    }

    pub(crate) async fn enter(&self, op: PlatformOp) -> PlatformResult<()> {
        {
            let mut calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
            *calls.entry(op).or_insert(0) += 1;
        }

        let delay = {
            let latency = self.latency.lock().unwrap_or_else(|e| e.into_inner());
            latency.get(&op).copied()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failure = {
            let mut failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
            failures.get_mut(&op).and_then(VecDeque::pop_front)
        };
        match failure {
            Some(err) => {
                tracing::debug!(?op, error = %err, "Injected platform failure");
                Err(err)
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failures_are_consumed_in_order() {
        let faults = FaultInjector::new();
        faults.fail_times(
            PlatformOp::CreateFile,
            2,
            PlatformError::Network("down".into()),
        );

        assert!(faults.enter(PlatformOp::CreateFile).await.is_err());
        assert!(faults.enter(PlatformOp::GetFile).await.is_ok());
        assert!(faults.enter(PlatformOp::CreateFile).await.is_err());
        assert!(faults.enter(PlatformOp::CreateFile).await.is_ok());
        assert_eq!(faults.call_count(PlatformOp::CreateFile), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_applied() {
        let faults = FaultInjector::new();
        faults.set_latency(PlatformOp::GetDocument, Duration::from_secs(2));

        let start = tokio::time::Instant::now();
        faults.enter(PlatformOp::GetDocument).await.expect("enter");
        assert!(start.elapsed() >= Duration::from_secs(2));
    }
}
