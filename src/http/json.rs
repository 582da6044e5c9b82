//! JSON calls with expected-status checks.
//!
//! Every status is a response at the transport level; these helpers turn
//! "wrong status" and "not a JSON object" into errors for the test.

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde_json::{Map, Value};

use crate::http::client::ResilientHttpClient;
use crate::http::error::{HttpError, Result};
use crate::http::request::RequestHeaders;
use crate::http::transport::Transport;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Longest body excerpt carried by `UnexpectedStatus`.
const BODY_EXCERPT: usize = 512;

/// Body of a JSON call.
///
/// Text is sent as given, so callers can post JSON they built by hand
/// (or deliberately malformed JSON); values are serialized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JsonBody<'a> {
    Text(&'a str),
    Value(&'a Value),
}

impl JsonBody<'_> {
    fn to_bytes(self) -> Result<Vec<u8>> {
        match self {
            JsonBody::Text(text) => Ok(text.as_bytes().to_vec()),
            JsonBody::Value(value) => serde_json::to_vec(value).map_err(HttpError::Serialize),
        }
    }
}

impl<'a> From<&'a str> for JsonBody<'a> {
    fn from(text: &'a str) -> Self {
        JsonBody::Text(text)
    }
}

impl<'a> From<&'a String> for JsonBody<'a> {
    fn from(text: &'a String) -> Self {
        JsonBody::Text(text)
    }
}

impl<'a> From<&'a Value> for JsonBody<'a> {
    fn from(value: &'a Value) -> Self {
        JsonBody::Value(value)
    }
}

/// A checked JSON response.
#[derive(Debug, Clone)]
pub struct JsonResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// `None` for empty bodies.
    pub body: Option<Map<String, Value>>,
}

/// Status expected when the caller does not name one.
pub fn default_status(method: &Method) -> StatusCode {
    if *method == Method::PUT || *method == Method::DELETE {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::OK
    }
}

impl<T: Transport> ResilientHttpClient<T> {
    /// Calls `url` with an optional JSON body and checks the response.
    pub fn call_json(
        &self,
        method: Method,
        url: &str,
        mut headers: RequestHeaders,
        body: Option<JsonBody<'_>>,
        expected: impl Into<Option<StatusCode>>,
    ) -> Result<JsonResponse> {
        let expected = expected.into().unwrap_or_else(|| default_status(&method));

        let payload = match body {
            Some(value) => {
                if !headers.contains(CONTENT_TYPE.as_str()) {
                    headers.set(CONTENT_TYPE.as_str(), JSON_CONTENT_TYPE)?;
                }
                Some(value.to_bytes()?)
            }
            None => None,
        };

        let response = self.call(method, url, headers, payload)?;
        if response.status != expected {
            let mut body = response.text();
            if body.len() > BODY_EXCERPT {
                let mut cut = BODY_EXCERPT;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(HttpError::UnexpectedStatus {
                expected,
                actual: response.status,
                body,
            });
        }

        let body = match response.body.as_deref() {
            None => None,
            Some(bytes) if expected == StatusCode::NO_CONTENT || expected == StatusCode::NOT_FOUND => {
                return Err(HttpError::UnexpectedBody {
                    status: expected,
                    len: bytes.len(),
                })
            }
            Some(bytes) => Some(parse_object(bytes)?),
        };

        Ok(JsonResponse {
            status: response.status,
            headers: response.headers,
            body,
        })
    }

    pub fn get_json(
        &self,
        url: &str,
        headers: RequestHeaders,
        expected: impl Into<Option<StatusCode>>,
    ) -> Result<JsonResponse> {
        self.call_json(Method::GET, url, headers, None, expected)
    }

    pub fn post_json<'a>(
        &self,
        url: &str,
        body: impl Into<JsonBody<'a>>,
        headers: RequestHeaders,
        expected: impl Into<Option<StatusCode>>,
    ) -> Result<JsonResponse> {
        self.call_json(Method::POST, url, headers, Some(body.into()), expected)
    }

    pub fn put_json<'a>(
        &self,
        url: &str,
        body: impl Into<JsonBody<'a>>,
        headers: RequestHeaders,
        expected: impl Into<Option<StatusCode>>,
    ) -> Result<JsonResponse> {
        self.call_json(Method::PUT, url, headers, Some(body.into()), expected)
    }

    pub fn delete_json(
        &self,
        url: &str,
        headers: RequestHeaders,
        expected: impl Into<Option<StatusCode>>,
    ) -> Result<JsonResponse> {
        self.call_json(Method::DELETE, url, headers, None, expected)
    }
}

fn parse_object(bytes: &[u8]) -> Result<Map<String, Value>> {
    if bytes.first() != Some(&b'{') {
        return Err(HttpError::NotJsonObject);
    }
    match serde_json::from_slice::<Value>(bytes).map_err(HttpError::InvalidJson)? {
        Value::Object(map) => Ok(map),
        _ => Err(HttpError::NotJsonObject),
    }
}
