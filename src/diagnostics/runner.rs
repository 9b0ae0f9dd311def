//! Probe set runner.
//!
//! Executes the probes in their fixed order, one at a time, and records
//! every outcome. A failing probe never stops the run: each
//! [`ProbeError`] becomes a failed [`ProbeResult`] and execution moves on.

use std::time::Instant;

use futures_util::future::join_all;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::probe::{EndpointCheck, ProbeName, ProbeResult, ProbeResultSet};
use crate::client::{Acquire, RateLimiter, SecondaryEndpoint, AVAILABILITY_ENDPOINTS};
use crate::config::Config;
use crate::error::ProbeError;
use crate::traits::ProbeClient;

/// Skip reason when the primary credential is absent.
pub const NO_CREDENTIAL_REASON: &str = "no credential provided";

/// Skip reason for probes that did not finish before cancellation.
pub const CANCELLED_REASON: &str = "run cancelled";

/// Skip reason for usage statistics when the models listing failed.
pub const USAGE_PREREQUISITE_REASON: &str = "secondaryModels did not succeed";

/// Skip reason when the local request budget is exhausted.
pub const RATE_LIMITED_REASON: &str = "local rate limit reached";

/// Completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeRun {
    /// One result per probe.
    pub results: ProbeResultSet,
    /// Whether the run was cut short by cancellation.
    pub cancelled: bool,
}

/// What a single attempt produced, before timing is attached.
enum Attempt {
    Passed(Option<Value>),
    Failed {
        error: String,
        payload: Option<Value>,
    },
}

impl From<Result<Value, ProbeError>> for Attempt {
    fn from(result: Result<Value, ProbeError>) -> Self {
        match result {
            Ok(payload) => Self::Passed(Some(payload)),
            Err(e) => Self::Failed {
                error: e.to_string(),
                payload: None,
            },
        }
    }
}

/// Runs the probe sequence against a [`ProbeClient`].
///
/// The runner holds no per-run state; each probe is bounded by the probe
/// timeout of the [`Config`] passed to [`run`](Self::run).
#[derive(Debug)]
pub struct ProbeRunner<C: ProbeClient> {
    client: C,
}

impl<C: ProbeClient> ProbeRunner<C> {
    /// Create a runner.
    #[must_use]
    pub const fn new(client: C) -> Self {
        Self { client }
    }

    /// Run every probe in order with a fresh request budget sized from `config`.
    pub async fn run(&self, config: &Config, cancel: &CancellationToken) -> ProbeRun {
        let limiter = RateLimiter::new(config.rate_limit_max_requests, config.rate_limit_window());
        self.run_with_limiter(config, cancel, &limiter).await
    }

    /// Run every probe in order, drawing requests from `limiter`.
    ///
    /// The returned set always covers every [`ProbeName`]. When `cancel`
    /// fires, completed results are kept and the probe in flight plus all
    /// later ones are recorded as skipped with [`CANCELLED_REASON`]. A probe
    /// the limiter refuses is skipped with [`RATE_LIMITED_REASON`] and sends
    /// nothing.
    pub async fn run_with_limiter(
        &self,
        config: &Config,
        cancel: &CancellationToken,
        limiter: &RateLimiter,
    ) -> ProbeRun {
        let timeout = config.probe_timeout();
        let mut results = ProbeResultSet::new();
        let mut cancelled = false;

        for name in ProbeName::ALL {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            if let Some(reason) = Self::skip_reason(name, config, &results) {
                tracing::info!(probe = %name, reason, "Probe skipped");
                results.record(ProbeResult::skipped(name, reason));
                continue;
            }

            if let denied @ Acquire::Denied { .. } = limiter.try_acquire_many(name.request_count()) {
                tracing::warn!(
                    probe = %name,
                    retry_after_seconds = denied.retry_after_seconds(),
                    "Probe skipped, local rate limit reached"
                );
                results.record(ProbeResult::skipped(name, RATE_LIMITED_REASON));
                continue;
            }

            tracing::info!(probe = %name, "Running probe");
            let start = Instant::now();

            let attempt = tokio::select! {
                biased;
                () = cancel.cancelled() => None,
                attempt = tokio::time::timeout(timeout, self.attempt(name, config)) => Some(attempt),
            };
            let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            let result = match attempt {
                None => {
                    tracing::warn!(probe = %name, elapsed_ms, "Run cancelled while probe in flight");
                    cancelled = true;
                    break;
                }
                Some(Err(_)) => {
                    let error = ProbeError::Timeout {
                        timeout_ms: config.probe_timeout_ms,
                    };
                    tracing::warn!(probe = %name, elapsed_ms, "Probe timed out");
                    ProbeResult::failed(name, error.to_string())
                }
                Some(Ok(Attempt::Passed(payload))) => {
                    tracing::info!(probe = %name, elapsed_ms, "Probe passed");
                    let result = ProbeResult::passed(name);
                    match payload {
                        Some(payload) => result.with_payload(payload),
                        None => result,
                    }
                }
                Some(Ok(Attempt::Failed { error, payload })) => {
                    if name == ProbeName::SecondaryChat {
                        tracing::info!(probe = %name, elapsed_ms, error = %error, "Probe failed (expected for the secondary credential)");
                    } else {
                        tracing::warn!(probe = %name, elapsed_ms, error = %error, "Probe failed");
                    }
                    let result = ProbeResult::failed(name, error);
                    match payload {
                        Some(payload) => result.with_payload(payload),
                        None => result,
                    }
                }
            };

            results.record(result.with_response_time(elapsed_ms));
        }

        if cancelled {
            let skipped = results.skip_missing(CANCELLED_REASON);
            tracing::warn!(skipped = skipped.len(), "Diagnostic run cancelled");
        }

        ProbeRun { results, cancelled }
    }

    /// Why `name` must not run, given the results so far.
    fn skip_reason(
        name: ProbeName,
        config: &Config,
        results: &ProbeResultSet,
    ) -> Option<&'static str> {
        match name {
            ProbeName::PrimaryAuth if config.api_key.is_none() => Some(NO_CREDENTIAL_REASON),
            ProbeName::UsageStats if !results.passed(ProbeName::SecondaryModels) => {
                Some(USAGE_PREREQUISITE_REASON)
            }
            _ => None,
        }
    }

    async fn attempt(&self, name: ProbeName, config: &Config) -> Attempt {
        match name {
            ProbeName::PrimaryAuth => self
                .client
                .primary_auth(config)
                .await
                .and_then(|outcome| {
                    serde_json::to_value(outcome).map_err(|e| ProbeError::UnexpectedResponse {
                        message: e.to_string(),
                    })
                })
                .into(),
            ProbeName::SecondaryModels => self
                .client
                .secondary(config, SecondaryEndpoint::Models)
                .await
                .into(),
            ProbeName::SecondaryChat => self
                .client
                .secondary(config, SecondaryEndpoint::ChatCompletions)
                .await
                .into(),
            ProbeName::EndpointAvailability => self.check_endpoints(config).await,
            ProbeName::ServiceHealth => self
                .client
                .secondary(config, SecondaryEndpoint::Health)
                .await
                .into(),
            ProbeName::UsageStats => self
                .client
                .secondary(config, SecondaryEndpoint::Usage)
                .await
                .into(),
        }
    }

    /// Check every availability path concurrently and collect them in fixed order.
    async fn check_endpoints(&self, config: &Config) -> Attempt {
        let statuses = join_all(
            AVAILABILITY_ENDPOINTS
                .iter()
                .map(|endpoint| self.client.endpoint_status(config, *endpoint)),
        )
        .await;

        let mut checks = Vec::with_capacity(AVAILABILITY_ENDPOINTS.len());
        let mut unreachable = Vec::new();
        for (endpoint, status) in AVAILABILITY_ENDPOINTS.iter().zip(statuses) {
            let check = match status {
                Ok(status) => EndpointCheck::answered(endpoint.path, endpoint.method, status),
                Err(e) => EndpointCheck::unreachable(endpoint.path, endpoint.method, e.to_string()),
            };
            tracing::debug!(
                path = endpoint.path,
                method = %endpoint.method,
                status = ?check.status,
                reachable = check.reachable,
                "Endpoint checked"
            );
            if !check.reachable {
                unreachable.push(endpoint.path);
            }
            checks.push(check);
        }

        let payload = serde_json::to_value(&checks).ok();
        if unreachable.is_empty() {
            Attempt::Passed(payload)
        } else {
            Attempt::Failed {
                error: format!("Unreachable endpoints: {}", unreachable.join(", ")),
                payload,
            }
        }
    }
}
