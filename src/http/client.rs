//! HTTP client with transparent CSRF recovery.
//!
//! # Responsibilities
//! - Resolve and validate the target before any exchange
//! - Perform the exchange through the injected transport
//! - On a CSRF rejection, retry once with the token taken from `Set-Cookie`
//!
//! # Recovery
//! ```text
//! call(method, url, headers, body)
//!     → exchange #1
//!     → status != 403, no CsrfState, or CSRF header already sent? → return
//!     → merge Set-Cookie pairs into Cookie, set CSRF header
//!     → exchange #2 → return as-is
//! ```
//!
//! # Design Decisions
//! - At most two exchanges per call; the retry always carries the CSRF header
//! - Transport errors are never interpreted as CSRF conditions
//! - Collaborators are immutable; the client can be shared across threads

use reqwest::Method;
use uuid::Uuid;

use crate::config::HarnessConfig;
use crate::http::csrf::CsrfState;
use crate::http::error::Result;
use crate::http::request::{ExchangeRequest, RequestHeaders};
use crate::http::response::ExchangeResponse;
use crate::http::target::{parse_target, AppUrl};
use crate::http::transport::{ReqwestTransport, Transport};

/// HTTP client that recovers once from a CSRF rejection.
#[derive(Debug, Clone)]
pub struct ResilientHttpClient<T = ReqwestTransport> {
    transport: T,
    csrf: Option<CsrfState>,
    base_url: Option<AppUrl>,
}

impl ResilientHttpClient<ReqwestTransport> {
    /// Builds a client with the reqwest transport, CSRF naming and base URL from config.
    pub fn from_config(config: &HarnessConfig) -> Result<Self> {
        let mut client = Self::new(ReqwestTransport::new(&config.http)?)
            .with_base_url(AppUrl::new(config.app.base_url.clone()));
        if let Some(csrf) = &config.csrf {
            client = client.with_csrf(CsrfState::from(csrf));
        }
        Ok(client)
    }
}

impl<T: Transport> ResilientHttpClient<T> {
    /// Client without CSRF recovery or base URL.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            csrf: None,
            base_url: None,
        }
    }

    pub fn with_csrf(mut self, csrf: CsrfState) -> Self {
        self.csrf = Some(csrf);
        self
    }

    /// Resolve relative URLs against `base`.
    pub fn with_base_url(mut self, base: AppUrl) -> Self {
        self.base_url = Some(base);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn csrf(&self) -> Option<&CsrfState> {
        self.csrf.as_ref()
    }

    pub fn base_url(&self) -> Option<&AppUrl> {
        self.base_url.as_ref()
    }

    /// Performs the call, recovering once from a CSRF rejection.
    pub fn call(
        &self,
        method: Method,
        url: &str,
        headers: RequestHeaders,
        body: Option<Vec<u8>>,
    ) -> Result<ExchangeResponse> {
        let target = match &self.base_url {
            Some(base) => base.resolve(url),
            None => url.to_string(),
        };
        let url = parse_target(&target)?;

        let span = tracing::debug_span!(
            "http_call",
            call_id = %Uuid::new_v4(),
            method = %method,
            url = %url,
        );
        let _enter = span.enter();

        let request = ExchangeRequest {
            method,
            url,
            headers,
            body,
        };
        let response = self.transport.exchange(&request)?;

        let Some(csrf) = &self.csrf else {
            return Ok(response);
        };
        if !csrf.should_recover(&request.headers, &response) {
            return Ok(response);
        }

        let headers = csrf.recovery_headers(&request.headers, &response)?;
        tracing::info!(
            header = %csrf.header_name(),
            cookies = response.set_cookies().len(),
            "CSRF rejection, retrying with refreshed token"
        );

        let retry = ExchangeRequest { headers, ..request };
        self.transport.exchange(&retry)
    }

    pub fn get(&self, url: &str, headers: RequestHeaders) -> Result<ExchangeResponse> {
        self.call(Method::GET, url, headers, None)
    }

    pub fn post(
        &self,
        url: &str,
        headers: RequestHeaders,
        body: Option<Vec<u8>>,
    ) -> Result<ExchangeResponse> {
        self.call(Method::POST, url, headers, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::error::HttpError;
    use reqwest::header::{HeaderValue, SET_COOKIE};
    use reqwest::StatusCode;
    use std::collections::VecDeque;
    use std::io;
    use std::sync::Mutex;

    /// Replays canned responses and records every request it sees.
    #[derive(Default)]
    struct ScriptedTransport {
        responses: Mutex<VecDeque<Result<ExchangeResponse>>>,
        seen: Mutex<Vec<ExchangeRequest>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<Result<ExchangeResponse>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                seen: Mutex::default(),
            }
        }

        fn seen(&self) -> Vec<ExchangeRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl Transport for ScriptedTransport {
        fn exchange(&self, request: &ExchangeRequest) -> Result<ExchangeResponse> {
            self.seen.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(ExchangeResponse::new(StatusCode::IM_A_TEAPOT)))
        }
    }

    fn rejection() -> ExchangeResponse {
        ExchangeResponse::new(StatusCode::FORBIDDEN)
            .with_header(SET_COOKIE, HeaderValue::from_static("session=abc; Path=/"))
            .with_header(SET_COOKIE, HeaderValue::from_static("X-CSRF=tok123; Path=/"))
    }

    fn csrf_client(responses: Vec<Result<ExchangeResponse>>) -> ResilientHttpClient<ScriptedTransport> {
        ResilientHttpClient::new(ScriptedTransport::new(responses)).with_csrf(CsrfState::new("X-CSRF"))
    }

    #[test]
    fn test_non_rejection_is_returned_unchanged() {
        let client = csrf_client(vec![Ok(ExchangeResponse::new(StatusCode::OK).with_body("hello"))]);

        let response = client
            .get("http://app.test/api", RequestHeaders::new())
            .unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.text(), "hello");
        assert_eq!(client.transport().seen().len(), 1);
    }

    #[test]
    fn test_rejection_retries_once_with_token() {
        let client = csrf_client(vec![Ok(rejection()), Ok(ExchangeResponse::new(StatusCode::OK))]);

        let response = client
            .post("http://app.test/api/save", RequestHeaders::new(), Some(b"{}".to_vec()))
            .unwrap();

        assert_eq!(response.status, StatusCode::OK);
        let seen = client.transport().seen();
        assert_eq!(seen.len(), 2);

        let retry = &seen[1];
        assert_eq!(retry.method, Method::POST);
        assert_eq!(retry.url.as_str(), "http://app.test/api/save");
        assert_eq!(retry.body.as_deref(), Some(&b"{}"[..]));
        assert_eq!(retry.headers.cookie(), Some("session=abc; X-CSRF=tok123"));
        assert_eq!(retry.headers.get("X-CSRF"), Some("tok123"));
    }

    #[test]
    fn test_rejection_merges_caller_cookie() {
        let client = csrf_client(vec![Ok(rejection()), Ok(ExchangeResponse::new(StatusCode::OK))]);
        let headers = RequestHeaders::from_pairs([("Cookie", "pref=dark")]).unwrap();

        client.get("http://app.test/", headers).unwrap();

        let seen = client.transport().seen();
        assert_eq!(seen[0].headers.cookie(), Some("pref=dark"));
        assert_eq!(
            seen[1].headers.cookie(),
            Some("pref=dark; session=abc; X-CSRF=tok123")
        );
        assert_eq!(seen[1].headers.as_header_map().get_all("cookie").iter().count(), 1);
    }

    #[test]
    fn test_retry_keeps_non_ascii_caller_cookie() {
        let rejection = ExchangeResponse::new(StatusCode::FORBIDDEN)
            .with_header(SET_COOKIE, HeaderValue::from_static("X-CSRF=tok123; Path=/"));
        let client = csrf_client(vec![Ok(rejection), Ok(ExchangeResponse::new(StatusCode::OK))]);
        let headers = RequestHeaders::from_pairs([("Cookie", "name=café")]).unwrap();

        client.get("http://app.test/", headers).unwrap();

        let seen = client.transport().seen();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].headers.cookie(), Some("name=café; X-CSRF=tok123"));
        assert_eq!(seen[1].headers.get("X-CSRF"), Some("tok123"));
    }

    #[test]
    fn test_second_rejection_is_returned() {
        let second = rejection().with_body("still forbidden");
        let client = csrf_client(vec![Ok(rejection()), Ok(second)]);

        let response = client.get("http://app.test/", RequestHeaders::new()).unwrap();

        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert_eq!(response.text(), "still forbidden");
        assert_eq!(client.transport().seen().len(), 2);
    }

    #[test]
    fn test_caller_csrf_header_disables_recovery() {
        let client = csrf_client(vec![Ok(rejection())]);
        let headers = RequestHeaders::from_pairs([("x-csrf", "stale")]).unwrap();

        let response = client.get("http://app.test/", headers).unwrap();

        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert_eq!(client.transport().seen().len(), 1);
    }

    #[test]
    fn test_no_csrf_state_disables_recovery() {
        let client = ResilientHttpClient::new(ScriptedTransport::new(vec![Ok(rejection())]));

        let response = client.get("http://app.test/", RequestHeaders::new()).unwrap();

        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert_eq!(client.transport().seen().len(), 1);
    }

    #[test]
    fn test_missing_token_cookie_retries_with_empty_header() {
        let first = ExchangeResponse::new(StatusCode::FORBIDDEN)
            .with_header(SET_COOKIE, HeaderValue::from_static("session=abc; Path=/"));
        let client = csrf_client(vec![Ok(first), Ok(ExchangeResponse::new(StatusCode::FORBIDDEN))]);

        client.get("http://app.test/", RequestHeaders::new()).unwrap();

        let seen = client.transport().seen();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].headers.get("X-CSRF"), Some(""));
    }

    #[test]
    fn test_transport_error_propagates() {
        let failure = HttpError::Transport(Box::new(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "connection refused",
        )));
        let client = csrf_client(vec![Err(failure)]);

        let err = client.get("http://app.test/", RequestHeaders::new()).unwrap_err();

        assert!(matches!(err, HttpError::Transport(_)));
        assert_eq!(client.transport().seen().len(), 1);
    }

    #[test]
    fn test_malformed_target_fails_before_exchange() {
        let client = csrf_client(vec![]);

        let err = client.get("::not a url::", RequestHeaders::new()).unwrap_err();

        assert!(matches!(err, HttpError::MalformedTarget { .. }));
        assert!(client.transport().seen().is_empty());
    }

    #[test]
    fn test_relative_url_uses_base() {
        let client = csrf_client(vec![Ok(ExchangeResponse::new(StatusCode::OK))])
            .with_base_url(AppUrl::new("http://app.test/root/"));

        client.get("/api/items", RequestHeaders::new()).unwrap();

        assert_eq!(
            client.transport().seen()[0].url.as_str(),
            "http://app.test/root/api/items"
        );
    }
}
