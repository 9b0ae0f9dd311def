//! Probe transport.
//!
//! This module provides:
//! - [`HttpProbeClient`], the HTTP implementation of
//!   [`ProbeClient`](crate::traits::ProbeClient)
//! - Wire types for the chat, models, health and usage endpoints
//! - A sliding-window [`RateLimiter`]; the probe runner draws each run's
//!   request budget from one
//!
//! # Architecture
//!
//! The client uses `reqwest` for HTTP and:
//! - Makes exactly one outbound call per probe, with no retries
//! - Maps status codes and transport failures to [`ProbeError`](crate::error::ProbeError)
//! - Resolves `/health`, `/usage` and the availability paths against the
//!   service root rather than the versioned API base
//!
//! # Example
//!
//! ```
//! use nilai_diagnostics::client::{ClientConfig, HttpProbeClient};
//!
//! let client = HttpProbeClient::new(ClientConfig::new().with_timeout_ms(5_000))
//!     .expect("client builds");
//! assert_eq!(client.config().timeout_ms, 5_000);
//! ```

#[allow(clippy::module_inception)]
mod client;
mod config;
mod rate_limit;
mod types;

pub use client::HttpProbeClient;
pub use config::{ClientConfig, DEFAULT_BODY_PREVIEW_CHARS, DEFAULT_USER_AGENT};
pub use rate_limit::{Acquire, RateLimitStatus, RateLimiter};
pub use types::{
    parse_model_list, ChatChoice, ChatMessage, ChatOutcome, ChatRequest, ChatResponse,
    ChoiceMessage, EndpointSpec, HealthStatus, HttpMethod, ModelInfo, ModelsOutcome,
    SecondaryEndpoint, TokenUsage, UsageStats, AVAILABILITY_ENDPOINTS, PRIMARY_PROBE_PROMPT,
    SECONDARY_PROBE_PROMPT,
};
