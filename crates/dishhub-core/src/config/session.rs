//! Session manager settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How the delay between attempts evolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackoffKind {
    /// Same delay before every retry.
    Fixed,
    /// Delay multiplied after every retry, capped at the maximum.
    #[default]
    Exponential,
}

/// Retry settings for account creation during sign-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts including the first one.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Backoff strategy.
    #[serde(default)]
    pub backoff: BackoffKind,
    /// Delay before the first retry, in milliseconds.
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,
    /// Upper bound for any delay, in milliseconds.
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
    /// Multiplier applied per retry for exponential backoff.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    /// Randomize each delay by up to ±30%.
    #[serde(default)]
    pub jitter: bool,
}

impl RetryConfig {
    /// Delay before the first retry.
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    /// Upper bound for any delay.
    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff: BackoffKind::default(),
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
            multiplier: default_multiplier(),
            jitter: false,
        }
    }
}

/// Session manager configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Retry policy for account creation.
    #[serde(default)]
    pub signup_retry: RetryConfig,
    /// Where the CLI keeps the session credential between invocations.
    #[serde(default = "default_session_file")]
    pub session_file: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            signup_retry: RetryConfig::default(),
            session_file: default_session_file(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay() -> u64 {
    1000
}

fn default_max_delay() -> u64 {
    8000
}

fn default_multiplier() -> f64 {
    2.0
}

fn default_session_file() -> String {
    ".dishhub/session".to_string()
}
