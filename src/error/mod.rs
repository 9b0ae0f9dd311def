//! Error types for the diagnostics toolkit.
//!
//! This module defines a hierarchical error system:
//! - [`AppError`]: Top-level application errors
//! - [`ProbeError`]: Transport failures of a single probe call
//! - [`ConfigError`]: Configuration errors
//! - [`ExportError`]: Report serialization and file output errors
//!
//! Probe errors never escape a diagnostic run: the probe layer turns them
//! into failed [`ProbeResult`](crate::diagnostics::ProbeResult)s. Only
//! configuration misuse surfaces from [`run_diagnostics`](crate::diagnostics::run_diagnostics).
//!
//! All errors implement `Send + Sync` for async compatibility.

use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Probe transport error.
    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Report export error.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Failure of a single outbound probe call.
///
/// The `Display` output is what ends up in `ProbeResult.error`, so the
/// wording is user-facing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The service rejected the credential (401/403).
    #[error("Authentication failed: {message}")]
    AuthenticationFailed {
        /// Server-provided reason, if any.
        message: String,
    },

    /// The service answered 429.
    #[error("Rate limited: retry after {retry_after_seconds}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_seconds: u64,
    },

    /// The probe did not finish within its time bound.
    #[error("timeout")]
    Timeout {
        /// Timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// Network communication error.
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error.
        message: String,
    },

    /// Non-success HTTP status that is not otherwise classified.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        body: String,
    },

    /// Response arrived but its payload was malformed or incomplete.
    #[error("Unexpected response: {message}")]
    UnexpectedResponse {
        /// Description of what was unexpected.
        message: String,
    },

    /// A credential the probe needs was not supplied.
    #[error("Missing credential: {credential}")]
    MissingCredential {
        /// Which credential is missing.
        credential: String,
    },
}

/// Configuration errors.
///
/// These errors represent failures in configuration loading and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required configuration is missing.
    #[error("Missing required: {var}")]
    MissingRequired {
        /// The missing variable name.
        var: String,
    },

    /// Configuration value is invalid.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue {
        /// The variable name.
        var: String,
        /// Why the value is invalid.
        reason: String,
    },
}

/// Report export errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// Writing the report to disk failed.
    #[error("Failed to write {path}: {message}")]
    Io {
        /// Target path.
        path: String,
        /// Underlying I/O error.
        message: String,
    },

    /// Serializing the report failed.
    #[error("Failed to serialize report: {message}")]
    Serialize {
        /// Underlying serializer error.
        message: String,
    },
}
