//! Bounded polling of eventually-consistent state.
//!
//! # Responsibilities
//! - Re-evaluate a condition until it is satisfied or the attempt times out
//! - Retry timed-out attempts up to `max_retries` times with `retry_wait`
//! - Propagate evaluation failures immediately
//!
//! # Design Decisions
//! - Explicit bounded loop; retry count never depends on call-stack depth
//! - Every attempt evaluates the condition at least once
//! - Sleeps never overshoot the attempt deadline

use std::error::Error as StdError;
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::resilience::condition::Outcome;
use crate::resilience::policy::WaitPolicy;

/// Errors surfaced by [`wait_until`].
#[derive(Debug, Error)]
pub enum WaitError {
    /// The condition was never satisfied within the full timeout+retry budget.
    #[error("timed out waiting for {condition} after {attempts} attempt(s) (budget {budget:?})")]
    Timeout {
        /// Description of the unmet condition.
        condition: String,
        /// Attempts made, always `max_retries + 1`.
        attempts: u32,
        /// Worst-case budget of the policy.
        budget: Duration,
    },

    /// Evaluating the condition failed; never retried.
    #[error("evaluating {condition} failed: {source}")]
    ConditionFailed {
        /// Description of the condition being evaluated.
        condition: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

/// Blocks until `condition` is satisfied, returning its value.
///
/// Attempt 1 lasts `policy.attempt_timeout`; each of the `policy.max_retries`
/// following attempts lasts `policy.retry_wait`.
///
/// # Example
///
/// ```
/// use web_harness::resilience::{wait_until, Outcome, WaitPolicy};
/// use std::time::Duration;
///
/// let policy = WaitPolicy::default().with_attempt_timeout(Duration::from_millis(200));
/// let mut polls = 0;
/// let value = wait_until(
///     || -> Result<_, std::io::Error> {
///         polls += 1;
///         Ok(if polls >= 3 { Outcome::Satisfied(polls) } else { Outcome::NotYetSatisfied })
///     },
///     &policy,
///     "third poll",
/// )
/// .unwrap();
/// assert_eq!(value, 3);
/// ```
pub fn wait_until<T, E, F>(mut condition: F, policy: &WaitPolicy, description: &str) -> Result<T, WaitError>
where
    F: FnMut() -> Result<Outcome<T>, E>,
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    let mut remaining = policy.max_retries;
    let mut timeout = policy.attempt_timeout;
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        tracing::debug!(
            condition = description,
            attempt = attempts,
            timeout_ms = timeout.as_millis() as u64,
            "Waiting for condition"
        );

        if let Some(value) = run_attempt(&mut condition, timeout, policy.poll_interval, description)? {
            tracing::debug!(condition = description, attempt = attempts, "Condition satisfied");
            return Ok(value);
        }

        if remaining == 0 {
            return Err(WaitError::Timeout {
                condition: description.to_string(),
                attempts,
                budget: policy.worst_case(),
            });
        }

        remaining -= 1;
        timeout = policy.retry_wait;
        tracing::warn!(
            condition = description,
            attempt = attempts,
            retries_left = remaining,
            "Condition not met, retrying"
        );
    }
}

/// Runs one attempt. `Ok(None)` means the attempt timed out.
fn run_attempt<T, E, F>(
    condition: &mut F,
    timeout: Duration,
    poll_interval: Duration,
    description: &str,
) -> Result<Option<T>, WaitError>
where
    F: FnMut() -> Result<Outcome<T>, E>,
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    let start = Instant::now();

    loop {
        match condition() {
            Ok(Outcome::Satisfied(value)) => return Ok(Some(value)),
            Ok(Outcome::NotYetSatisfied) => {}
            Err(e) => {
                return Err(WaitError::ConditionFailed {
                    condition: description.to_string(),
                    source: e.into(),
                })
            }
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return Ok(None);
        }

        thread::sleep(poll_interval.min(timeout - elapsed));
    }
}
