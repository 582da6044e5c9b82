//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0)
//! - Check that the base URL and CSRF header name are usable on the wire
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HarnessConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use reqwest::header::HeaderName;
use thiserror::Error;
use url::Url;

use crate::config::schema::HarnessConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("app.base_url '{url}' is invalid: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },

    #[error("csrf.header_name '{0}' is not a valid HTTP header name")]
    InvalidCsrfHeader(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &HarnessConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.app.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::InvalidBaseUrl {
            url: config.app.base_url.clone(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidBaseUrl {
            url: config.app.base_url.clone(),
            reason: e.to_string(),
        }),
    }

    if config.wait.attempt_timeout_secs == 0 {
        errors.push(ValidationError::ZeroDuration { field: "wait.attempt_timeout_secs" });
    }
    // Retry wait only matters when retries are enabled
    if config.wait.max_retries > 0 && config.wait.retry_wait_secs == 0 {
        errors.push(ValidationError::ZeroDuration { field: "wait.retry_wait_secs" });
    }
    if config.wait.poll_interval_ms == 0 {
        errors.push(ValidationError::ZeroDuration { field: "wait.poll_interval_ms" });
    }
    if config.http.timeout_secs == 0 {
        errors.push(ValidationError::ZeroDuration { field: "http.timeout_secs" });
    }

    if let Some(csrf) = &config.csrf {
        if HeaderName::from_bytes(csrf.header_name.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidCsrfHeader(csrf.header_name.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
