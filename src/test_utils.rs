//! Test utilities and mock factories.
//!
//! This module provides shared testing infrastructure:
//! - Result-set fixtures for classifier and report tests
//! - Mock probe clients with a fixed outcome per endpoint
//! - A fixed clock
//!
//! Only compiled for tests (`#[cfg(test)]`).

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use crate::client::{ChatOutcome, SecondaryEndpoint};
use crate::config::{Config, SecretString};
use crate::diagnostics::{
    classify, generate, ProbeName, ProbeResult, ProbeResultSet, ProbeRun, NO_CREDENTIAL_REASON,
};
use crate::error::ProbeError;
use crate::report::Report;
use crate::traits::{MockProbeClient, MockTimeProvider};

/// A 64-character hex key that passes format validation.
pub const VALID_KEY: &str = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";

/// Fixed report timestamp.
#[must_use]
pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()
}

/// Clock that always returns [`fixed_time`].
#[must_use]
pub fn mock_time_provider() -> MockTimeProvider {
    let mut mock = MockTimeProvider::new();
    mock.expect_now().return_const(fixed_time());
    mock
}

/// Complete result set from the three probes the classifier reads.
///
/// `primary: None` records the primary probe as skipped. Usage statistics
/// follow the models probe, as the runner would record them.
#[must_use]
pub fn results_from(primary: Option<bool>, secondary: bool, health: bool) -> ProbeResultSet {
    let outcome = |name, ok: bool| {
        if ok {
            ProbeResult::passed(name).with_response_time(42)
        } else {
            ProbeResult::failed(name, "HTTP 401: Invalid token").with_response_time(42)
        }
    };

    let mut set = ProbeResultSet::new();
    set.record(primary.map_or_else(
        || ProbeResult::skipped(ProbeName::PrimaryAuth, NO_CREDENTIAL_REASON),
        |ok| outcome(ProbeName::PrimaryAuth, ok),
    ));
    set.record(outcome(ProbeName::SecondaryModels, secondary));
    set.record(outcome(ProbeName::SecondaryChat, false));
    set.record(outcome(ProbeName::EndpointAvailability, true));
    set.record(outcome(ProbeName::ServiceHealth, health));
    set.record(if secondary {
        outcome(ProbeName::UsageStats, true)
    } else {
        ProbeResult::skipped(ProbeName::UsageStats, "secondaryModels did not succeed")
    });
    set
}

/// Report for `results`, classified and assembled at [`fixed_time`].
#[must_use]
pub fn sample_report(api_key: Option<&str>, results: ProbeResultSet) -> Report {
    let config = Config {
        api_key: api_key.map(SecretString::new),
        ..Config::default()
    };
    let diagnosis = classify(&results);
    let recommendations = generate(&diagnosis, &results, &config);
    Report::assemble(
        &config,
        ProbeRun {
            results,
            cancelled: false,
        },
        diagnosis,
        recommendations,
        fixed_time(),
    )
}

/// Mock client whose primary, models and health calls pass or fail as given.
///
/// Secondary chat always fails with a 401; usage and endpoint checks succeed.
#[must_use]
pub fn mock_client(primary: bool, secondary: bool, health: bool) -> MockProbeClient {
    let mut mock = MockProbeClient::new();
    mock.expect_primary_auth().returning(move |config| {
        if primary {
            Ok(ChatOutcome {
                response: "Connection successful!".to_string(),
                model: config.model.clone(),
                usage: None,
            })
        } else {
            Err(ProbeError::AuthenticationFailed {
                message: "Invalid API key".to_string(),
            })
        }
    });
    mock.expect_secondary()
        .returning(move |_, endpoint| match endpoint {
            SecondaryEndpoint::Models if secondary => Ok(json!({"count": 1, "models": ["m"]})),
            SecondaryEndpoint::Models => Err(ProbeError::Network {
                message: "connection refused".to_string(),
            }),
            SecondaryEndpoint::ChatCompletions => Err(ProbeError::AuthenticationFailed {
                message: "read-only token".to_string(),
            }),
            SecondaryEndpoint::Health if health => Ok(json!({"status": "ok"})),
            SecondaryEndpoint::Health => Err(ProbeError::HttpStatus {
                status: 503,
                body: "unavailable".to_string(),
            }),
            SecondaryEndpoint::Usage => Ok(json!({"queries": 7, "total_tokens": 1200})),
        });
    mock.expect_endpoint_status().returning(|_, _| Ok(200));
    mock
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::TimeProvider;

    #[test]
    fn test_results_from_is_complete() {
        let set = results_from(None, false, true);
        assert!(set.is_complete());
        assert!(set.skipped(ProbeName::PrimaryAuth));
        assert!(set.skipped(ProbeName::UsageStats));
    }

    #[test]
    fn test_mock_time_provider() {
        assert_eq!(mock_time_provider().now(), fixed_time());
    }
}
