//! HTTP client subsystem.
//!
//! # Data Flow
//! ```text
//! call(method, url, headers, body)
//!     → target.rs (resolve against base URL, parse; fail fast)
//!     → request.rs (case-insensitive headers, Cookie merge)
//!     → transport.rs (one exchange)
//!     → csrf.rs (403? build recovery headers from Set-Cookie)
//!     → transport.rs (at most one more exchange)
//!     → response.rs / json.rs (status, multi-valued headers, body checks)
//! ```

pub mod client;
pub mod cookie;
pub mod csrf;
pub mod error;
pub mod json;
pub mod request;
pub mod response;
pub mod target;
pub mod transport;

pub use client::ResilientHttpClient;
pub use csrf::{CsrfState, CSRF_REJECTION};
pub use error::HttpError;
pub use json::{JsonBody, JsonResponse};
pub use request::{ExchangeRequest, RequestHeaders};
pub use response::ExchangeResponse;
pub use target::AppUrl;
pub use transport::{ReqwestTransport, Transport};

pub use reqwest::{Method, StatusCode};
