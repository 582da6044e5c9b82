//! Response of one exchange.
//!
//! Headers stay multi-valued: repeated `Set-Cookie` lines are kept
//! individually and in order, never merged. Values are decoded as lossy
//! UTF-8 so a stray byte in one attribute never hides the cookie pair.

use std::borrow::Cow;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, SET_COOKIE};
use reqwest::StatusCode;

use crate::http::request::header_str;

/// Status, headers and body of one HTTP exchange.
#[derive(Debug, Clone)]
pub struct ExchangeResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl ExchangeResponse {
    /// Response with no headers and no body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Appends a header value, keeping earlier values of the same name.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        self.body = (!body.is_empty()).then_some(body);
        self
    }

    /// Every `Set-Cookie` value in order.
    pub fn set_cookies(&self) -> Vec<Cow<'_, str>> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()))
            .collect()
    }

    /// The header value when `name` occurs exactly once.
    pub fn single_header(&self, name: &str) -> Option<&str> {
        let mut values = self.headers.get_all(name).iter();
        match (values.next(), values.next()) {
            (Some(value), None) => header_str(value),
            _ => None,
        }
    }

    /// Body decoded as UTF-8 (lossy); empty when there is no body.
    pub fn text(&self) -> String {
        self.body
            .as_deref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_cookies_are_not_merged() {
        let response = ExchangeResponse::new(StatusCode::FORBIDDEN)
            .with_header(SET_COOKIE, HeaderValue::from_static("session=abc; Path=/"))
            .with_header(SET_COOKIE, HeaderValue::from_static("X-CSRF=tok123; Path=/"));

        assert_eq!(
            response.set_cookies(),
            vec!["session=abc; Path=/", "X-CSRF=tok123; Path=/"]
        );
    }

    #[test]
    fn test_set_cookie_with_non_ascii_attribute_is_kept() {
        let response = ExchangeResponse::new(StatusCode::FORBIDDEN)
            .with_header(SET_COOKIE, HeaderValue::from_str("X-CSRF=tok123; Path=/café").unwrap())
            .with_header(SET_COOKIE, HeaderValue::from_bytes(b"lang=en; Path=/\xe9").unwrap());

        let cookies = response.set_cookies();
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[0], "X-CSRF=tok123; Path=/café");
        assert!(cookies[1].starts_with("lang=en; Path=/"));
    }

    #[test]
    fn test_single_header() {
        let response = ExchangeResponse::new(StatusCode::OK)
            .with_header(
                HeaderName::from_static("content-type"),
                HeaderValue::from_static("application/json"),
            )
            .with_header(SET_COOKIE, HeaderValue::from_static("a=1"))
            .with_header(SET_COOKIE, HeaderValue::from_static("b=2"));

        assert_eq!(response.single_header("Content-Type"), Some("application/json"));
        assert_eq!(response.single_header("set-cookie"), None);
        assert_eq!(response.single_header("x-missing"), None);
    }

    #[test]
    fn test_empty_body_is_none() {
        let response = ExchangeResponse::new(StatusCode::NO_CONTENT).with_body("");
        assert!(response.body.is_none());
        assert_eq!(response.text(), "");
    }
}
