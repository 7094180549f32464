//! Retry policy: decides how many extra attempts an operation gets.

use serde::{Deserialize, Serialize};

/// Retries granted after the initial attempt when nothing else is configured.
pub const DEFAULT_RETRY_COUNT: u32 = 2;

/// Retry budget for one logical backend operation.
///
/// There is no backoff: retries run immediately after the failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Additional attempts after the first one.
    pub retry_count: u32,
}

impl RetryPolicy {
    pub fn new(retry_count: u32) -> Self {
        Self { retry_count }
    }

    /// Single attempt, failures surface immediately.
    pub fn no_retry() -> Self {
        Self::new(0)
    }

    /// Upper bound on operation invocations per `execute` call.
    pub fn max_attempts(&self) -> u32 {
        self.retry_count.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_COUNT)
    }
}
