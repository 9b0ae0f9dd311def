//! Diagnostic engine.
//!
//! This module provides:
//! - [`ProbeRunner`]: executes the probe sequence
//! - [`classify`]: maps results to a [`Diagnosis`]
//! - [`generate`]: turns a diagnosis into [`Recommendation`]s
//! - [`DiagnosticService`] and [`run_diagnostics`]: the end-to-end entry points
//!
//! # Flow
//!
//! ```text
//! Config ──▶ ProbeRunner ──▶ ProbeResultSet ──▶ classify ──▶ Diagnosis
//!                                   │                           │
//!                                   └────────▶ generate ◀───────┘
//!                                                 │
//!                                                 ▼
//!                                              Report
//! ```
//!
//! # Example
//!
//! ```
//! use nilai_diagnostics::diagnostics::{classify, ProbeName, ProbeResult, ProbeResultSet, Scenario};
//!
//! let results: ProbeResultSet = [
//!     ProbeResult::skipped(ProbeName::PrimaryAuth, "no credential provided"),
//!     ProbeResult::passed(ProbeName::SecondaryModels),
//!     ProbeResult::passed(ProbeName::ServiceHealth),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert_eq!(classify(&results).scenario, Scenario::CredentialIssue);
//! ```

mod classifier;
mod probe;
mod recommendations;
mod runner;

pub use classifier::{classify, Diagnosis, Rule, Scenario, Severity, RULES};
pub use probe::{
    EndpointCheck, ProbeName, ProbeResult, ProbeResultSet, ProbeStatus, REQUESTS_PER_RUN,
};
pub use recommendations::{
    generate, Priority, Recommendation, SDK_INSTALL_COMMAND, SUBSCRIPTION_URL,
};
pub use runner::{
    ProbeRun, ProbeRunner, CANCELLED_REASON, NO_CREDENTIAL_REASON, RATE_LIMITED_REASON,
    USAGE_PREREQUISITE_REASON,
};

use tokio_util::sync::CancellationToken;

use crate::client::HttpProbeClient;
use crate::config::{validate_config, Config};
use crate::error::AppError;
use crate::report::Report;
use crate::traits::{ProbeClient, RealTimeProvider, TimeProvider};

/// Runs probes, classifies and assembles the report.
///
/// Each call to [`run`](Self::run) owns its result set, request budget and
/// timeout; concurrent runs on one service share nothing but the client.
#[derive(Debug)]
pub struct DiagnosticService<C: ProbeClient, T: TimeProvider = RealTimeProvider> {
    runner: ProbeRunner<C>,
    time: T,
}

impl DiagnosticService<HttpProbeClient, RealTimeProvider> {
    /// Service over the HTTP client, sized from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] if the configuration is invalid or the HTTP
    /// client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        validate_config(config)?;
        let client = HttpProbeClient::from_config(config)?;
        Ok(Self::new(client, RealTimeProvider))
    }
}

impl<C: ProbeClient, T: TimeProvider> DiagnosticService<C, T> {
    /// Create a service.
    #[must_use]
    pub const fn new(client: C, time: T) -> Self {
        Self {
            runner: ProbeRunner::new(client),
            time,
        }
    }

    /// Run a full diagnostic.
    ///
    /// Operational failures (rejected credentials, unreachable service,
    /// cancellation) are part of the returned [`Report`], never errors.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if `config` is invalid.
    pub async fn run(
        &self,
        config: &Config,
        cancel: &CancellationToken,
    ) -> Result<Report, AppError> {
        validate_config(config)?;

        tracing::info!(
            base_url = %config.base_url,
            model = %config.model,
            api_key_provided = config.api_key.is_some(),
            "Starting diagnostic run"
        );

        let run = self.runner.run(config, cancel).await;
        let diagnosis = classify(&run.results);
        let recommendations = generate(&diagnosis, &run.results, config);

        tracing::info!(
            scenario = %diagnosis.scenario,
            severity = %diagnosis.severity,
            recommendations = recommendations.len(),
            cancelled = run.cancelled,
            "Diagnosis complete"
        );

        Ok(Report::assemble(
            config,
            run,
            diagnosis,
            recommendations,
            self.time.now(),
        ))
    }
}

/// Run a full diagnostic over HTTP.
///
/// # Errors
///
/// Returns [`AppError`] only for an invalid configuration.
pub async fn run_diagnostics(config: &Config) -> Result<Report, AppError> {
    run_diagnostics_with_cancel(config, &CancellationToken::new()).await
}

/// [`run_diagnostics`] with a cancellation token.
///
/// # Errors
///
/// Returns [`AppError`] only for an invalid configuration.
pub async fn run_diagnostics_with_cancel(
    config: &Config,
    cancel: &CancellationToken,
) -> Result<Report, AppError> {
    DiagnosticService::from_config(config)?
        .run(config, cancel)
        .await
}
