//! Trait definitions for mockable dependencies.
//!
//! This module defines traits for:
//! - [`ProbeClient`]: the network side of every probe
//! - [`TimeProvider`]: time abstraction for report timestamps
//!
//! # Mocking
//!
//! All traits are annotated with `#[cfg_attr(test, mockall::automock)]`
//! which generates mock implementations automatically for testing.
//!
//! # Example
//!
//! ```
//! use nilai_diagnostics::traits::{TimeProvider, RealTimeProvider};
//!
//! let time_provider = RealTimeProvider;
//! let now = time_provider.now();
//! println!("Current time: {now}");
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::client::{ChatOutcome, EndpointSpec, SecondaryEndpoint};
use crate::config::Config;
use crate::error::ProbeError;

/// Network operations behind the probes.
///
/// Implementations perform exactly one outbound call per method invocation
/// and never retry. Every failure is reported as a [`ProbeError`]; the probe
/// layer turns it into a failed result.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProbeClient: Send + Sync {
    /// Chat round trip authenticated with the primary credential.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] on transport failure, a rejected credential,
    /// a non-success status, or a response without a usable choice.
    async fn primary_auth(&self, config: &Config) -> Result<ChatOutcome, ProbeError>;

    /// Call one secondary-credential endpoint and return its payload.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] when the endpoint fails its success condition.
    async fn secondary(
        &self,
        config: &Config,
        endpoint: SecondaryEndpoint,
    ) -> Result<Value, ProbeError>;

    /// Hit an endpoint path and report the HTTP status it answered with.
    ///
    /// Any status counts as an answer; only transport failures are errors.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] when no response was received.
    async fn endpoint_status(
        &self,
        config: &Config,
        endpoint: EndpointSpec,
    ) -> Result<u16, ProbeError>;
}

/// Time provider trait for mocking.
#[cfg_attr(test, mockall::automock)]
pub trait TimeProvider: Send + Sync {
    /// Get the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Real time provider using system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealTimeProvider;

impl TimeProvider for RealTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
