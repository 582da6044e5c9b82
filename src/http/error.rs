//! Error types for HTTP exchanges.

use std::error::Error as StdError;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by the HTTP client and its JSON helpers.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The URL cannot be parsed; raised before any network attempt.
    #[error("malformed target '{url}': {reason}")]
    MalformedTarget { url: String, reason: String },

    /// Network or protocol failure in the underlying transport.
    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// A header name or value cannot be sent on the wire.
    #[error("invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("expected status {expected}, got {actual}: {body}")]
    UnexpectedStatus {
        expected: StatusCode,
        actual: StatusCode,
        body: String,
    },

    #[error("expected no body with status {status}, got {len} bytes")]
    UnexpectedBody { status: StatusCode, len: usize },

    /// Top-level JSON must be an object; arrays are open to JSON hijacking.
    #[error("JSON response is not a JSON object")]
    NotJsonObject,

    #[error("unable to parse JSON response: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("unable to serialize request body: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        HttpError::Transport(Box::new(err))
    }
}

/// A specialized Result type for HTTP operations.
pub type Result<T> = std::result::Result<T, HttpError>;
