//! Wait policy.
//!
//! # Design Decisions
//! - First attempt uses the long timeout to absorb normal page-load latency
//! - Retries use the shorter `retry_wait`; they only absorb transient flakiness
//! - No retries by default

use std::time::Duration;

use crate::config::WaitConfig;

/// Default timeout of the first attempt (15 seconds).
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default timeout of each retry attempt (5 seconds).
pub const DEFAULT_RETRY_WAIT: Duration = Duration::from_secs(5);

/// Default pause between evaluations (100ms).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Timeout/retry configuration governing one bounded poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Timeout of the first attempt.
    pub attempt_timeout: Duration,

    /// Timeout of every retry attempt.
    pub retry_wait: Duration,

    /// Additional attempts after the first; total attempts = `max_retries + 1`.
    pub max_retries: u32,

    /// Pause between evaluations inside one attempt.
    pub poll_interval: Duration,
}

impl WaitPolicy {
    /// Creates a policy with the default poll interval.
    pub fn new(attempt_timeout: Duration, retry_wait: Duration, max_retries: u32) -> Self {
        Self {
            attempt_timeout,
            retry_wait,
            max_retries,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn with_retry_wait(mut self, wait: Duration) -> Self {
        self.retry_wait = wait;
        self
    }

    pub fn with_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Worst-case blocking time: `attempt_timeout + max_retries * retry_wait`.
    pub fn worst_case(&self) -> Duration {
        self.attempt_timeout
            .saturating_add(self.retry_wait.saturating_mul(self.max_retries))
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ATTEMPT_TIMEOUT, DEFAULT_RETRY_WAIT, 0)
    }
}

impl From<&WaitConfig> for WaitPolicy {
    fn from(config: &WaitConfig) -> Self {
        Self {
            attempt_timeout: Duration::from_secs(config.attempt_timeout_secs),
            retry_wait: Duration::from_secs(config.retry_wait_secs),
            max_retries: config.max_retries,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        }
    }
}
