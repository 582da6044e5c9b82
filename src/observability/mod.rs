//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Poller / client / console checks produce:
//!     → tracing events (attempts, retries, CSRF recovery)
//!     → http_call spans carrying a per-call correlation id
//!
//! Consumers:
//!     → logging.rs subscriber (stderr)
//! ```
//!
//! # Design Decisions
//! - Structured fields, never token or cookie values
//! - Log level configurable via config and environment

pub mod logging;

pub use logging::init_logging;
