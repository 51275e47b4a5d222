//! Retry policy with fixed or exponential backoff.
//!
//! Delays go through `tokio::time::sleep`, so tests drive the policy on a
//! paused clock.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

use dishhub_core::config::{BackoffKind, RetryConfig};

/// How often and how patiently to repeat a failing call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: BackoffKind,
    initial_delay: Duration,
    max_delay: Duration,
    multiplier: f64,
    jitter: bool,
}

impl RetryPolicy {
    /// Build a policy from configuration. At least one attempt is made.
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            backoff: config.backoff,
            initial_delay: config.initial_delay(),
            max_delay: config.max_delay(),
            multiplier: config.multiplier.max(1.0),
            jitter: config.jitter,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::fixed(1, Duration::ZERO)
    }

    /// Fixed delay between attempts, no jitter.
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: BackoffKind::Fixed,
            initial_delay: delay,
            max_delay: delay,
            multiplier: 1.0,
            jitter: false,
        }
    }

    /// Total attempts, the first one included.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before retry number `retry` (1-based), before jitter.
    pub fn delay_for(&self, retry: u32) -> Duration {
        match self.backoff {
            BackoffKind::Fixed => self.initial_delay,
            BackoffKind::Exponential => {
                let exponent = retry.saturating_sub(1) as i32;
                let millis = self.initial_delay.as_millis() as f64 * self.multiplier.powi(exponent);
                let capped = millis.min(self.max_delay.as_millis() as f64);
                Duration::from_millis(capped as u64)
            }
        }
    }

    fn jittered(&self, delay: Duration) -> Duration {
        if !self.jitter {
            return delay;
        }
        let factor = rand::rng().random_range(0.7..1.3);
        Duration::from_millis((delay.as_millis() as f64 * factor) as u64)
    }

    /// Run `op` until it succeeds, attempts run out, or it fails with an
    /// error `should_retry` rejects. The last error is returned.
    pub async fn run<F, Fut, T, E>(&self, mut op: F, should_retry: impl Fn(&E) -> bool) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_attempts && should_retry(&e) => {
                    let delay = self.jittered(self.delay_for(attempt));
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}
