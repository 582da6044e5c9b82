//! Outgoing request model.
//!
//! # Responsibilities
//! - Hold caller headers with case-insensitive names
//! - Merge repeated names into a single value (`Cookie` with "; ", others with ", ")
//! - Describe one exchange attempt (method, absolute URL, headers, body)
//!
//! # Design Decisions
//! - Built on `HeaderMap` so name handling matches what goes on the wire
//! - Invalid names/values are rejected when added, not when sent
//! - Values are read back as UTF-8, so non-ASCII text survives merging

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, COOKIE};
use reqwest::Method;
use url::Url;

use crate::http::cookie::merge_cookie_header;
use crate::http::error::{HttpError, Result};

/// Request headers: one value per case-insensitive name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestHeaders {
    map: HeaderMap,
}

impl RequestHeaders {
    /// Empty header set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds headers from name/value pairs, merging repeated names.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut headers = Self::new();
        for (name, value) in pairs {
            headers.append(name.as_ref(), value.as_ref())?;
        }
        Ok(headers)
    }

    /// Adds a value, merging with any existing value of the same name.
    pub fn append(&mut self, name: &str, value: &str) -> Result<()> {
        let header = parse_name(name)?;
        let merged = match self.get(name) {
            None => value.to_string(),
            Some(existing) if header == COOKIE => {
                merge_cookie_header(Some(existing), &[value]).unwrap_or_default()
            }
            Some(existing) => format!("{existing}, {value}"),
        };
        self.map.insert(header, parse_value(name, &merged)?);
        Ok(())
    }

    /// Sets a value, replacing any existing value of the same name.
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        let header = parse_name(name)?;
        self.map.insert(header, parse_value(name, value)?);
        Ok(())
    }

    /// Value of a header; names are case-insensitive.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(name).and_then(header_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// The single `Cookie` value, if any.
    pub fn cookie(&self) -> Option<&str> {
        self.map.get(COOKIE).and_then(header_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map
            .iter()
            .filter_map(|(name, value)| Some((name.as_str(), header_str(value)?)))
    }

    pub fn as_header_map(&self) -> &HeaderMap {
        &self.map
    }
}

/// A header value as text.
///
/// `to_str` rejects anything outside visible ASCII; values here are built
/// from `&str`, so the bytes are always UTF-8.
pub(crate) fn header_str(value: &HeaderValue) -> Option<&str> {
    std::str::from_utf8(value.as_bytes()).ok()
}

fn parse_name(name: &str) -> Result<HeaderName> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| HttpError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

fn parse_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| HttpError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

/// One exchange attempt.
#[derive(Debug, Clone)]
pub struct ExchangeRequest {
    pub method: Method,
    pub url: Url,
    pub headers: RequestHeaders,
    pub body: Option<Vec<u8>>,
}
