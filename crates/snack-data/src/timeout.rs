//! Timeout configuration for fetch operations.

use std::time::Duration;

/// Timeout configuration for a fetch operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Limit for a single attempt.
    pub attempt: Duration,
    /// Limit for the whole call, retries and backoff included.
    pub total: Duration,
}

impl TimeoutConfig {
    /// Create a new timeout configuration.
    pub fn new(attempt: Duration, total: Duration) -> Self {
        Self { attempt, total }
    }

    /// Derive the overall budget from a per-attempt timeout and retry count.
    ///
    /// Leaves room for every attempt plus the default backoff in between.
    pub fn for_attempts(attempt: Duration, max_retries: u32) -> Self {
        let attempts = max_retries.saturating_add(1);
        let backoff = Duration::from_millis(1000).saturating_mul(2u32.saturating_pow(attempts));
        Self {
            attempt,
            total: attempt.saturating_mul(attempts).saturating_add(backoff),
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            attempt: Duration::from_millis(3000),
            total: Duration::from_millis(10_000),
        }
    }
}
