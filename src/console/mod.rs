//! Browser console checks.
//!
//! # Data Flow
//! ```text
//! ConsoleConfig (app prefix, extra expected substrings)
//!     → expectations.rs (immutable ConsoleExpectations, built once)
//!     → check(lines captured by the browser driver)
//!     → Ok | ConsoleError
//! ```

pub mod expectations;

pub use expectations::{ConsoleError, ConsoleExpectations, HANDLED_CONFLICT};
