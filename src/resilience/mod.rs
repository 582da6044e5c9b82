//! Resilience subsystem: bounded polling.
//!
//! # Data Flow
//! ```text
//! Caller-supplied condition
//!     → poller.rs (evaluate until satisfied or attempt deadline)
//!     → On timeout: retry with policy.rs retry_wait, at most max_retries times
//!     → Satisfied(value) | WaitError::Timeout | WaitError::ConditionFailed
//! ```
//!
//! # Design Decisions
//! - "Not yet" (retryable) and "evaluation failed" (fatal) are distinct types
//! - Nested lookups compose into one condition so the budget stays accurate
//! - Cancellation is the condition's job: observe a signal, return `Err`

pub mod condition;
pub mod policy;
pub mod poller;

pub use condition::Outcome;
pub use policy::{WaitPolicy, DEFAULT_ATTEMPT_TIMEOUT, DEFAULT_POLL_INTERVAL, DEFAULT_RETRY_WAIT};
pub use poller::{wait_until, WaitError};
