//! Single-exchange transports.
//!
//! # Responsibilities
//! - Perform exactly one HTTP exchange per call
//! - Return every status as a response; only network/protocol failures are errors
//!
//! # Design Decisions
//! - Blocking I/O; callers are synchronous test steps
//! - Redirects are not followed by default so tests can assert on 3xx
//! - No cookie store: cookies travel only in explicit `Cookie` headers

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::redirect::Policy;

use crate::config::HttpConfig;
use crate::http::error::Result;
use crate::http::request::ExchangeRequest;
use crate::http::response::ExchangeResponse;

/// Performs one HTTP exchange.
pub trait Transport: Send + Sync {
    fn exchange(&self, request: &ExchangeRequest) -> Result<ExchangeResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn exchange(&self, request: &ExchangeRequest) -> Result<ExchangeResponse> {
        (**self).exchange(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn exchange(&self, request: &ExchangeRequest) -> Result<ExchangeResponse> {
        (**self).exchange(request)
    }
}

/// Transport backed by a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let redirect = if config.follow_redirects {
            Policy::default()
        } else {
            Policy::none()
        };

        let client = Client::builder()
            .redirect(redirect)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn exchange(&self, request: &ExchangeRequest) -> Result<ExchangeResponse> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.as_header_map().clone());
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send()?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes()?;

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            status = status.as_u16(),
            bytes = body.len(),
            "Exchange complete"
        );

        Ok(ExchangeResponse {
            status,
            headers,
            body: (!body.is_empty()).then(|| body.to_vec()),
        })
    }
}
