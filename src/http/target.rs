//! Application URL resolution.

use url::Url;

use crate::http::error::{HttpError, Result};

/// Default application base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/";

/// Base URL of the application under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppUrl {
    base: String,
}

impl AppUrl {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// Prefixes `path` with the base URL.
    ///
    /// Paths already under the base, and absolute http(s) URLs, are returned
    /// unchanged. One leading `/` is dropped before joining.
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with(&self.base) || is_absolute(path) {
            return path.to_string();
        }

        let relative = path.strip_prefix('/').unwrap_or(path);
        if self.base.ends_with('/') {
            format!("{}{}", self.base, relative)
        } else {
            format!("{}/{}", self.base, relative)
        }
    }
}

impl Default for AppUrl {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

fn is_absolute(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

/// Parses an absolute URL, failing before any network attempt.
pub fn parse_target(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| HttpError::MalformedTarget {
        url: url.to_string(),
        reason: e.to_string(),
    })
}
