//! Configuration validation.
//!
//! This module provides validation logic for configuration values,
//! ensuring they are within acceptable ranges.

use reqwest::Url;

use super::Config;
use crate::diagnostics::REQUESTS_PER_RUN;
use crate::error::ConfigError;

/// Minimum allowed probe timeout in milliseconds (1 second).
pub const MIN_TIMEOUT_MS: u64 = 1000;

/// Maximum allowed probe timeout in milliseconds (2 minutes).
pub const MAX_TIMEOUT_MS: u64 = 120_000;

/// Validate configuration values.
///
/// # Errors
///
/// Returns [`ConfigError::MissingRequired`] if `NILAI_MODEL` or
/// `NILAI_BEARER_TOKEN` is empty, and [`ConfigError::InvalidValue`] if any
/// value is out of range:
/// - `NILAI_BASE_URL` must be an absolute http(s) URL
/// - `PROBE_TIMEOUT_MS` must be between 1000 and 120000
/// - `RATE_LIMIT_MAX_REQUESTS` must cover one full run
/// - `RATE_LIMIT_WINDOW_MS` must be non-zero
#[must_use = "validation result should be checked"]
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    validate_url(&config.base_url).map_err(|reason| ConfigError::InvalidValue {
        var: "NILAI_BASE_URL".into(),
        reason,
    })?;

    if config.model.trim().is_empty() {
        return Err(ConfigError::MissingRequired {
            var: "NILAI_MODEL".into(),
        });
    }

    if config.bearer_token.is_empty() {
        return Err(ConfigError::MissingRequired {
            var: "NILAI_BEARER_TOKEN".into(),
        });
    }

    if config.probe_timeout_ms < MIN_TIMEOUT_MS || config.probe_timeout_ms > MAX_TIMEOUT_MS {
        return Err(ConfigError::InvalidValue {
            var: "PROBE_TIMEOUT_MS".into(),
            reason: format!("must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS} ms"),
        });
    }

    if config.rate_limit_max_requests < REQUESTS_PER_RUN {
        return Err(ConfigError::InvalidValue {
            var: "RATE_LIMIT_MAX_REQUESTS".into(),
            reason: format!("must be at least {REQUESTS_PER_RUN} (one full run)"),
        });
    }

    if config.rate_limit_window_ms == 0 {
        return Err(ConfigError::InvalidValue {
            var: "RATE_LIMIT_WINDOW_MS".into(),
            reason: "must be greater than 0".into(),
        });
    }

    Ok(())
}

/// Check that `url` is an absolute `http://` or `https://` URL.
///
/// # Errors
///
/// Returns a human-readable reason when the URL is rejected.
pub fn validate_url(url: &str) -> Result<(), String> {
    if url.trim().is_empty() {
        return Err("URL must be a non-empty string".into());
    }

    let parsed = Url::parse(url).map_err(|_| "Invalid URL format".to_string())?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        _ => Err("URL must use http:// or https:// protocol".into()),
    }
}
