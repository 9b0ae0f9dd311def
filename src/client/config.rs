//! Probe client configuration.

use crate::config::{Config, DEFAULT_PROBE_TIMEOUT_MS};

/// Default `User-Agent` header.
pub const DEFAULT_USER_AGENT: &str = concat!("nilai-diagnostics/", env!("CARGO_PKG_VERSION"));

/// Default number of response-body characters kept in error messages.
pub const DEFAULT_BODY_PREVIEW_CHARS: usize = 200;

/// HTTP client configuration for [`HttpProbeClient`](super::HttpProbeClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Characters of an error body kept in [`ProbeError::HttpStatus`](crate::error::ProbeError::HttpStatus).
    pub body_preview_chars: usize,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a new client configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the client configuration from a run configuration.
    #[must_use]
    pub fn from_run_config(config: &Config) -> Self {
        Self::new().with_timeout_ms(config.probe_timeout_ms)
    }

    /// Set timeout in milliseconds.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the error-body preview length.
    #[must_use]
    pub const fn with_body_preview_chars(mut self, chars: usize) -> Self {
        self.body_preview_chars = chars;
        self
    }

    /// Set the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
            body_preview_chars: DEFAULT_BODY_PREVIEW_CHARS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
