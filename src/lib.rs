//! Web application test harness library

pub mod config;
pub mod console;
pub mod http;
pub mod observability;
pub mod resilience;

pub use config::schema::HarnessConfig;
pub use console::ConsoleExpectations;
pub use http::{CsrfState, ExchangeResponse, HttpError, RequestHeaders, ResilientHttpClient};
pub use resilience::{wait_until, Outcome, WaitError, WaitPolicy};
