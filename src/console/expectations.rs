//! Browser console expectations.
//!
//! # Responsibilities
//! - Separate the application's own log lines from browser noise
//! - Fail a check when the application logged `[ERROR]` lines
//! - Fail a check when the browser logged anything not expected
//!
//! # Design Decisions
//! - Built once from config and shared by reference; never mutated
//! - Matching is plain substring search
//! - An empty application prefix matches every line: all output counts as
//!   the application's, and only ` [ERROR]` lines fail

use thiserror::Error;

use crate::config::ConsoleConfig;

/// Browsers log handled 409 responses as resource failures.
pub const HANDLED_CONFLICT: &str =
    "Failed to load resource: the server responded with a status of 409";

/// Errors reported by [`ConsoleExpectations::check`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    #[error("application errors logged to the console:\n{}", .0.join("\n"))]
    ApplicationErrors(Vec<String>),

    #[error("unexpected browser console output:\n{}", .0.join("\n"))]
    UnexpectedBrowserErrors(Vec<String>),
}

/// Immutable set of console substrings that are not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleExpectations {
    app_prefix: String,
    expected: Vec<String>,
}

impl ConsoleExpectations {
    /// Expectations for an application that prefixes its log lines with `app_prefix`.
    pub fn new(app_prefix: &str) -> Self {
        Self {
            app_prefix: app_prefix.to_string(),
            expected: vec![app_prefix.to_string(), HANDLED_CONFLICT.to_string()],
        }
    }

    /// Adds a further expected substring; empty ones are ignored.
    pub fn with_expected(mut self, substring: impl Into<String>) -> Self {
        let substring = substring.into();
        if !substring.is_empty() && !self.expected.contains(&substring) {
            self.expected.push(substring);
        }
        self
    }

    pub fn expected(&self) -> &[String] {
        &self.expected
    }

    /// True when `line` contains any expected substring.
    pub fn is_expected(&self, line: &str) -> bool {
        self.expected.iter().any(|s| line.contains(s.as_str()))
    }

    /// Lines written by the application itself.
    pub fn app_lines<'a>(&self, lines: &[&'a str]) -> Vec<&'a str> {
        lines
            .iter()
            .copied()
            .filter(|l| l.contains(self.app_prefix.as_str()))
            .collect()
    }

    /// Lines matching no expected substring.
    pub fn unexpected<'a>(&self, lines: &[&'a str]) -> Vec<&'a str> {
        lines.iter().copied().filter(|l| !self.is_expected(l)).collect()
    }

    /// Checks a test's console output.
    pub fn check(&self, lines: &[&str]) -> Result<(), ConsoleError> {
        let marker = format!("{} [ERROR]", self.app_prefix);
        let errors: Vec<String> = self
            .app_lines(lines)
            .into_iter()
            .filter(|l| l.contains(&marker))
            .map(str::to_string)
            .collect();
        if !errors.is_empty() {
            return Err(ConsoleError::ApplicationErrors(errors));
        }

        let unexpected = self.unexpected(lines);
        if !unexpected.is_empty() {
            tracing::debug!(count = unexpected.len(), "Unexpected browser console output");
            return Err(ConsoleError::UnexpectedBrowserErrors(
                unexpected.into_iter().map(str::to_string).collect(),
            ));
        }
        Ok(())
    }
}

impl From<&ConsoleConfig> for ConsoleExpectations {
    fn from(config: &ConsoleConfig) -> Self {
        config
            .expected_errors
            .iter()
            .fold(Self::new(&config.app_prefix), |acc, s| acc.with_expected(s.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_include_handled_conflict() {
        let expectations = ConsoleExpectations::new("[app]");
        assert_eq!(expectations.expected(), &["[app]".to_string(), HANDLED_CONFLICT.to_string()]);
        assert!(expectations.is_expected(
            "http://localhost/api - Failed to load resource: the server responded with a status of 409 ()"
        ));
    }

    #[test]
    fn test_clean_console_passes() {
        let expectations = ConsoleExpectations::new("[app]");
        let lines = ["[app] [INFO] page ready", "[app] [DEBUG] cache warm"];
        assert_eq!(expectations.check(&lines), Ok(()));
    }

    #[test]
    fn test_application_error_fails() {
        let expectations = ConsoleExpectations::new("[app]");
        let lines = ["[app] [INFO] saving", "[app] [ERROR] save failed"];

        assert_eq!(
            expectations.check(&lines),
            Err(ConsoleError::ApplicationErrors(vec!["[app] [ERROR] save failed".into()]))
        );
    }

    #[test]
    fn test_browser_error_fails() {
        let expectations = ConsoleExpectations::new("[app]");
        let lines = ["[app] [INFO] ok", "Uncaught TypeError: x is undefined"];

        let err = expectations.check(&lines).unwrap_err();
        assert_eq!(
            err,
            ConsoleError::UnexpectedBrowserErrors(vec!["Uncaught TypeError: x is undefined".into()])
        );
        assert!(err.to_string().contains("Uncaught TypeError"));
    }

    #[test]
    fn test_empty_prefix_treats_all_output_as_application() {
        let expectations = ConsoleExpectations::new("");
        assert_eq!(expectations.app_lines(&["anything"]), vec!["anything"]);
        assert!(expectations.is_expected("Uncaught TypeError: x is undefined"));
        assert_eq!(expectations.expected().len(), 2);
    }

    #[test]
    fn test_default_config_passes_browser_noise() {
        let expectations = ConsoleExpectations::from(&ConsoleConfig::default());
        assert_eq!(
            expectations.check(&["[INFO] app started", "Uncaught TypeError: x is undefined"]),
            Ok(())
        );
    }

    #[test]
    fn test_default_config_fails_on_error_marker() {
        let expectations = ConsoleExpectations::from(&ConsoleConfig::default());
        assert_eq!(
            expectations.check(&["[INFO] ok", "main.js [ERROR] save failed"]),
            Err(ConsoleError::ApplicationErrors(vec!["main.js [ERROR] save failed".into()]))
        );
    }

    #[test]
    fn test_from_config_adds_extras() {
        let config = ConsoleConfig {
            app_prefix: "[app]".into(),
            expected_errors: vec!["favicon.ico".into(), "".into(), "favicon.ico".into()],
        };
        let expectations = ConsoleExpectations::from(&config);

        assert_eq!(expectations.expected().len(), 3);
        assert_eq!(expectations.check(&["GET /favicon.ico 404"]), Ok(()));
    }
}
