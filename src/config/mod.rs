//! Configuration management.
//!
//! This module handles:
//! - Environment variable loading
//! - Command-line overrides
//! - Configuration validation
//! - Secure credential storage via [`SecretString`]
//! - API key format rules
//!
//! # Example
//!
//! ```
//! use nilai_diagnostics::config::{Config, SecretString, DEFAULT_MODEL};
//!
//! // Build a config directly (use Config::from_env() in production)
//! let config = Config {
//!     api_key: Some(SecretString::new("example-api-key")),
//!     ..Config::default()
//! };
//!
//! assert_eq!(config.model, DEFAULT_MODEL);
//! // Credentials are protected from accidental logging
//! let debug = format!("{:?}", config);
//! assert!(debug.contains("<REDACTED>"));
//! assert!(!debug.contains("example-api-key"));
//! ```

mod credential;
mod secret;
mod validation;

pub use credential::{validate_api_key_format, CredentialCheck, KeyFormatError, API_KEY_LENGTH};
pub use secret::{SecretString, REDACTED, SHORT_SECRET_MASK};
pub use validation::{validate_config, validate_url, MAX_TIMEOUT_MS, MIN_TIMEOUT_MS};

use std::time::Duration;

use crate::error::ConfigError;

/// Default secondary (bearer) credential, a publicly documented test token.
pub const DEFAULT_BEARER_TOKEN: &str = "Nillion2025";

/// Default service endpoint.
pub const DEFAULT_BASE_URL: &str = "https://nilai-a779.nillion.network/v1";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "google/gemma-3-27b-it";

/// Default per-probe timeout in milliseconds.
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 15_000;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default number of outbound requests allowed per rate-limit window.
pub const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 10;

/// Default rate-limit window in milliseconds.
pub const DEFAULT_RATE_LIMIT_WINDOW_MS: u64 = 60_000;

/// Configuration of one diagnostic run.
///
/// Both credentials use [`SecretString`] to prevent accidental logging.
/// A `Config` is immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Primary credential (API key). `None` skips the primary probe.
    pub api_key: Option<SecretString>,
    /// Secondary credential (legacy bearer token).
    pub bearer_token: SecretString,
    /// Service base URL, usually ending in `/v1`.
    pub base_url: String,
    /// Model identifier used by chat probes.
    pub model: String,
    /// Upper bound for a single probe, in milliseconds.
    pub probe_timeout_ms: u64,
    /// Outbound requests allowed per rate-limit window.
    pub rate_limit_max_requests: u32,
    /// Rate-limit window in milliseconds.
    pub rate_limit_window_ms: u64,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            bearer_token: SecretString::new(DEFAULT_BEARER_TOKEN),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
            rate_limit_max_requests: DEFAULT_RATE_LIMIT_MAX_REQUESTS,
            rate_limit_window_ms: DEFAULT_RATE_LIMIT_WINDOW_MS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Values supplied on the command line that take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Primary credential.
    pub api_key: Option<String>,
    /// Secondary credential.
    pub bearer_token: Option<String>,
    /// Base URL.
    pub base_url: Option<String>,
    /// Model identifier.
    pub model: Option<String>,
    /// Probe timeout in milliseconds.
    pub probe_timeout_ms: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional:
    /// - `NILAI_API_KEY`: primary credential (default: none)
    /// - `NILAI_BEARER_TOKEN`: secondary credential (default: `Nillion2025`)
    /// - `NILAI_BASE_URL`: service base URL
    /// - `NILAI_MODEL`: model identifier
    /// - `PROBE_TIMEOUT_MS`: per-probe timeout (default: `15000`)
    /// - `RATE_LIMIT_MAX_REQUESTS`: requests per window (default: `10`)
    /// - `RATE_LIMIT_WINDOW_MS`: window length (default: `60000`)
    /// - `LOG_LEVEL`: logging level (default: `info`)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a numeric variable does not parse or any
    /// value fails validation (see [`validate_config`]).
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::read_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load the environment, apply `overrides` and validate the merged result once.
    ///
    /// An environment value that a command-line flag replaces is never
    /// validated on its own.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a numeric variable does not parse or the
    /// merged configuration is invalid.
    pub fn load(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let config = Self::read_env()?.merge(overrides);
        validate_config(&config)?;
        Ok(config)
    }

    /// Read every variable, falling back to defaults. Does not validate.
    fn read_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        Ok(Self {
            api_key: std::env::var("NILAI_API_KEY")
                .ok()
                .and_then(normalize_secret),
            bearer_token: SecretString::new(
                std::env::var("NILAI_BEARER_TOKEN").unwrap_or_else(|_| DEFAULT_BEARER_TOKEN.into()),
            ),
            base_url: std::env::var("NILAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into()),
            model: std::env::var("NILAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into()),
            probe_timeout_ms: parse_env_u64("PROBE_TIMEOUT_MS", DEFAULT_PROBE_TIMEOUT_MS)?,
            rate_limit_max_requests: parse_env_u32(
                "RATE_LIMIT_MAX_REQUESTS",
                DEFAULT_RATE_LIMIT_MAX_REQUESTS,
            )?,
            rate_limit_window_ms: parse_env_u64(
                "RATE_LIMIT_WINDOW_MS",
                DEFAULT_RATE_LIMIT_WINDOW_MS,
            )?,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.into()),
        })
    }

    /// Apply command-line overrides and re-validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the merged configuration is invalid.
    pub fn with_overrides(self, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let config = self.merge(overrides);
        validate_config(&config)?;
        Ok(config)
    }

    fn merge(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(api_key) = overrides.api_key {
            self.api_key = normalize_secret(api_key);
        }
        if let Some(bearer_token) = overrides.bearer_token {
            self.bearer_token = SecretString::new(bearer_token);
        }
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if let Some(model) = overrides.model {
            self.model = model;
        }
        if let Some(timeout) = overrides.probe_timeout_ms {
            self.probe_timeout_ms = timeout;
        }
        self
    }

    /// Per-probe timeout as a [`Duration`].
    #[must_use]
    pub const fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Rate-limit window as a [`Duration`].
    #[must_use]
    pub const fn rate_limit_window(&self) -> Duration {
        Duration::from_millis(self.rate_limit_window_ms)
    }

    /// Base URL without a trailing slash, used for `/models` and `/chat/completions`.
    #[must_use]
    pub fn api_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Service root: the base URL with a trailing `/v1` removed.
    ///
    /// Health, usage and endpoint-availability probes are resolved against it.
    ///
    /// ```
    /// use nilai_diagnostics::config::Config;
    ///
    /// let config = Config { base_url: "https://host.example/v1/".into(), ..Config::default() };
    /// assert_eq!(config.service_root(), "https://host.example");
    /// ```
    #[must_use]
    pub fn service_root(&self) -> &str {
        let url = self.api_url();
        url.strip_suffix("/v1").unwrap_or(url)
    }
}

/// Treat an empty or whitespace-only credential as absent.
fn normalize_secret(value: String) -> Option<SecretString> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(SecretString::new(trimmed))
    }
}

/// Parse an environment variable as u64, using a default if not set.
fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    std::env::var(name).map_or(Ok(default), |val| {
        val.parse().map_err(|_| ConfigError::InvalidValue {
            var: name.into(),
            reason: "must be a positive integer".into(),
        })
    })
}

/// Parse an environment variable as u32, using a default if not set.
fn parse_env_u32(name: &str, default: u32) -> Result<u32, ConfigError> {
    std::env::var(name).map_or(Ok(default), |val| {
        val.parse().map_err(|_| ConfigError::InvalidValue {
            var: name.into(),
            reason: "must be a positive integer".into(),
        })
    })
}
