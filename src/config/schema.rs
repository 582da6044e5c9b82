//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the harness.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the test harness.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HarnessConfig {
    /// Application under test.
    pub app: AppConfig,

    /// Polling/retry settings for UI waits.
    pub wait: WaitConfig,

    /// HTTP transport settings.
    pub http: HttpConfig,

    /// CSRF recovery settings. Recovery is disabled when absent.
    pub csrf: Option<CsrfConfig>,

    /// Browser console expectations.
    pub console: ConsoleConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Application under test.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL that relative paths are resolved against.
    pub base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/".to_string(),
        }
    }
}

/// Wait configuration for bounded polling.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WaitConfig {
    /// Timeout of the first attempt in seconds.
    pub attempt_timeout_secs: u64,

    /// Timeout of every retry attempt in seconds.
    pub retry_wait_secs: u64,

    /// Number of additional attempts after the first one times out.
    pub max_retries: u32,

    /// Pause between condition evaluations in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            attempt_timeout_secs: 15,
            retry_wait_secs: 5,
            max_retries: 0,
            poll_interval_ms: 100,
        }
    }
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Connect and read timeout in seconds.
    pub timeout_secs: u64,

    /// Follow redirects instead of returning 3xx responses to the caller.
    pub follow_redirects: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            follow_redirects: false,
        }
    }
}

/// CSRF recovery configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CsrfConfig {
    /// Name used for both the token cookie and the request header (e.g. "X-CSRF").
    pub header_name: String,
}

/// Browser console expectations.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Prefix the application puts on its own console log lines.
    pub app_prefix: String,

    /// Additional console substrings that are not considered errors.
    pub expected_errors: Vec<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
