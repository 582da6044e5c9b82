//! CSRF token recovery.
//!
//! # Responsibilities
//! - Name the token cookie/header pair used by the application
//! - Build the headers of the single recovery retry from a 403 response
//!
//! # Design Decisions
//! - Cookie name and header name are the same configured string
//! - A missing token cookie yields an empty header, never an error; the
//!   server's own validation of the retry reports the real problem
//! - Token values are never logged

use reqwest::StatusCode;

use crate::config::CsrfConfig;
use crate::http::cookie::{cookie_pair, merge_cookie_header, pair_value};
use crate::http::error::Result;
use crate::http::request::RequestHeaders;
use crate::http::response::ExchangeResponse;

/// Status that signals a missing or stale CSRF token.
pub const CSRF_REJECTION: StatusCode = StatusCode::FORBIDDEN;

/// The application's anti-forgery naming convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfState {
    header_name: String,
}

impl CsrfState {
    pub fn new(header_name: impl Into<String>) -> Self {
        Self {
            header_name: header_name.into(),
        }
    }

    /// Request header carrying the token.
    pub fn header_name(&self) -> &str {
        &self.header_name
    }

    /// Cookie carrying the token; same as the header name.
    pub fn cookie_name(&self) -> &str {
        &self.header_name
    }

    /// True when a response/request pair calls for recovery.
    pub fn should_recover(&self, sent: &RequestHeaders, response: &ExchangeResponse) -> bool {
        response.status == CSRF_REJECTION && !sent.contains(&self.header_name)
    }

    /// Headers for the recovery retry: the caller's headers with the
    /// response cookies merged into `Cookie` and the token header set.
    pub fn recovery_headers(
        &self,
        sent: &RequestHeaders,
        response: &ExchangeResponse,
    ) -> Result<RequestHeaders> {
        let set_cookies = response.set_cookies();
        let pairs: Vec<&str> = set_cookies.iter().filter_map(|c| cookie_pair(c)).collect();

        let mut headers = sent.clone();
        if let Some(cookie) = merge_cookie_header(sent.cookie(), &pairs) {
            headers.set("Cookie", &cookie)?;
        }

        let token = pair_value(&pairs, self.cookie_name()).unwrap_or_default();
        if token.is_empty() {
            tracing::warn!(
                cookie = %self.cookie_name(),
                "No CSRF cookie in rejection response, retrying with an empty token"
            );
        }
        headers.set(&self.header_name, token)?;

        Ok(headers)
    }
}

impl From<&CsrfConfig> for CsrfState {
    fn from(config: &CsrfConfig) -> Self {
        Self::new(config.header_name.clone())
    }
}
