//! Probe results and the per-run result set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{HttpMethod, AVAILABILITY_ENDPOINTS};

/// Fixed enumeration of probes.
///
/// Variant order is execution order, so a [`ProbeResultSet`] iterates in the
/// order the probes ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProbeName {
    /// Primary credential, end-to-end chat round trip.
    PrimaryAuth,
    /// Secondary credential against the models listing.
    SecondaryModels,
    /// Secondary credential against chat completions (expected to fail).
    SecondaryChat,
    /// Reachability of a fixed set of endpoint paths.
    EndpointAvailability,
    /// Credential-free health check.
    ServiceHealth,
    /// Usage counters, only when `SecondaryModels` passed.
    UsageStats,
}

/// Outbound requests made by one complete run.
pub const REQUESTS_PER_RUN: u32 = {
    let mut total = 0;
    let mut i = 0;
    while i < ProbeName::ALL.len() {
        total += ProbeName::ALL[i].request_count();
        i += 1;
    }
    total
};

impl ProbeName {
    /// All probes in execution order.
    pub const ALL: [Self; 6] = [
        Self::PrimaryAuth,
        Self::SecondaryModels,
        Self::SecondaryChat,
        Self::EndpointAvailability,
        Self::ServiceHealth,
        Self::UsageStats,
    ];

    /// Identifier used in serialized output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PrimaryAuth => "primaryAuth",
            Self::SecondaryModels => "secondaryModels",
            Self::SecondaryChat => "secondaryChat",
            Self::EndpointAvailability => "endpointAvailability",
            Self::ServiceHealth => "serviceHealth",
            Self::UsageStats => "usageStats",
        }
    }

    /// Outbound requests this probe makes when it runs.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn request_count(self) -> u32 {
        match self {
            Self::EndpointAvailability => AVAILABILITY_ENDPOINTS.len() as u32,
            _ => 1,
        }
    }

    /// Human-readable label for reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PrimaryAuth => "API Key Authentication",
            Self::SecondaryModels => "Bearer Token (/models)",
            Self::SecondaryChat => "Bearer Token (/chat/completions)",
            Self::EndpointAvailability => "Endpoint Availability",
            Self::ServiceHealth => "Service Health",
            Self::UsageStats => "Usage Statistics",
        }
    }
}

impl std::fmt::Display for ProbeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one probe. Exactly one state holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProbeStatus {
    /// The probe ran and met its success condition.
    Passed,
    /// The probe ran and failed.
    Failed {
        /// Human-readable failure description.
        error: String,
    },
    /// The probe was not attempted.
    Skipped {
        /// Why the probe was not attempted.
        reason: String,
    },
}

/// Result of one probe invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// Which probe produced this result.
    pub name: ProbeName,
    /// Passed, failed or skipped.
    #[serde(flatten)]
    pub status: ProbeStatus,
    /// Wall-clock duration of the attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    /// Probe-specific data (model list, usage counters, endpoint map).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl ProbeResult {
    /// A passed result.
    #[must_use]
    pub const fn passed(name: ProbeName) -> Self {
        Self {
            name,
            status: ProbeStatus::Passed,
            response_time_ms: None,
            payload: None,
        }
    }

    /// A failed result.
    #[must_use]
    pub fn failed(name: ProbeName, error: impl Into<String>) -> Self {
        Self {
            name,
            status: ProbeStatus::Failed {
                error: error.into(),
            },
            response_time_ms: None,
            payload: None,
        }
    }

    /// A skipped result. Skipped results never carry timing or payload.
    #[must_use]
    pub fn skipped(name: ProbeName, reason: impl Into<String>) -> Self {
        Self {
            name,
            status: ProbeStatus::Skipped {
                reason: reason.into(),
            },
            response_time_ms: None,
            payload: None,
        }
    }

    /// Attach the attempt duration.
    #[must_use]
    pub const fn with_response_time(mut self, ms: u64) -> Self {
        self.response_time_ms = Some(ms);
        self
    }

    /// Attach a payload.
    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Returns true if the probe ran and succeeded.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.status, ProbeStatus::Passed)
    }

    /// Returns true if the probe ran and failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self.status, ProbeStatus::Failed { .. })
    }

    /// Returns true if the probe was not attempted.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self.status, ProbeStatus::Skipped { .. })
    }

    /// Failure description, if failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            ProbeStatus::Failed { error } => Some(error),
            _ => None,
        }
    }

    /// Skip reason, if skipped.
    #[must_use]
    pub fn skip_reason(&self) -> Option<&str> {
        match &self.status {
            ProbeStatus::Skipped { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Results of one run, keyed by probe name.
///
/// Results are append-only: recording a probe that already has a result is
/// rejected. A probe with no result reads as skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProbeResultSet {
    results: BTreeMap<ProbeName, ProbeResult>,
}

impl ProbeResultSet {
    /// Create an empty result set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a result. Returns false, leaving the set unchanged, if the
    /// probe already has one.
    pub fn record(&mut self, result: ProbeResult) -> bool {
        if self.results.contains_key(&result.name) {
            tracing::warn!(probe = %result.name, "Ignoring duplicate probe result");
            return false;
        }
        self.results.insert(result.name, result);
        true
    }

    /// Result for `name`, if recorded.
    #[must_use]
    pub fn get(&self, name: ProbeName) -> Option<&ProbeResult> {
        self.results.get(&name)
    }

    /// Whether `name` ran and succeeded.
    #[must_use]
    pub fn passed(&self, name: ProbeName) -> bool {
        self.get(name).is_some_and(ProbeResult::success)
    }

    /// Whether `name` ran and failed.
    #[must_use]
    pub fn failed(&self, name: ProbeName) -> bool {
        self.get(name).is_some_and(ProbeResult::is_failed)
    }

    /// Whether `name` was skipped or never recorded.
    #[must_use]
    pub fn skipped(&self, name: ProbeName) -> bool {
        self.get(name).map_or(true, ProbeResult::is_skipped)
    }

    /// Mark every probe without a result as skipped with `reason`.
    ///
    /// Returns the probes that were filled in.
    pub fn skip_missing(&mut self, reason: &str) -> Vec<ProbeName> {
        let missing: Vec<_> = ProbeName::ALL
            .into_iter()
            .filter(|name| !self.results.contains_key(name))
            .collect();
        for name in &missing {
            self.results
                .insert(*name, ProbeResult::skipped(*name, reason));
        }
        missing
    }

    /// Whether every probe has a result.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        ProbeName::ALL
            .iter()
            .all(|name| self.results.contains_key(name))
    }

    /// Probes that ran and failed, in execution order.
    #[must_use]
    pub fn failed_probes(&self) -> Vec<ProbeName> {
        self.results
            .values()
            .filter(|r| r.is_failed())
            .map(|r| r.name)
            .collect()
    }

    /// Results in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &ProbeResult> {
        self.results.values()
    }

    /// Number of recorded results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl FromIterator<ProbeResult> for ProbeResultSet {
    fn from_iter<I: IntoIterator<Item = ProbeResult>>(iter: I) -> Self {
        let mut set = Self::new();
        for result in iter {
            set.record(result);
        }
        set
    }
}

/// Reachability of one endpoint path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointCheck {
    /// Path relative to the service root.
    pub path: String,
    /// HTTP method used.
    pub method: HttpMethod,
    /// Status the endpoint answered with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Answered with anything other than 404.
    pub reachable: bool,
    /// Transport failure, when no status was received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EndpointCheck {
    /// The endpoint answered with `status`.
    #[must_use]
    pub fn answered(path: impl Into<String>, method: HttpMethod, status: u16) -> Self {
        Self {
            path: path.into(),
            method,
            status: Some(status),
            reachable: status != 404,
            error: None,
        }
    }

    /// No response was received.
    #[must_use]
    pub fn unreachable(
        path: impl Into<String>,
        method: HttpMethod,
        error: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            method,
            status: None,
            reachable: false,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_probe_name_order_matches_execution_order() {
        let mut sorted = ProbeName::ALL;
        sorted.sort();
        assert_eq!(sorted, ProbeName::ALL);
    }

    #[test]
    fn test_probe_name_serializes_camel_case() {
        for name in ProbeName::ALL {
            assert_eq!(serde_json::to_value(name).unwrap(), json!(name.as_str()));
        }
    }

    #[test]
    fn test_result_states_are_exclusive() {
        let passed = ProbeResult::passed(ProbeName::ServiceHealth);
        let failed = ProbeResult::failed(ProbeName::ServiceHealth, "HTTP 503: down");
        let skipped = ProbeResult::skipped(ProbeName::ServiceHealth, "run cancelled");

        assert!(passed.success() && !passed.is_failed() && !passed.is_skipped());
        assert!(!failed.success() && failed.is_failed() && !failed.is_skipped());
        assert!(!skipped.success() && !skipped.is_failed() && skipped.is_skipped());
        assert_eq!(failed.error(), Some("HTTP 503: down"));
        assert_eq!(skipped.skip_reason(), Some("run cancelled"));
        assert_eq!(passed.error(), None);
    }

    #[test]
    fn test_result_serialization_shape() {
        let result = ProbeResult::failed(ProbeName::PrimaryAuth, "timeout").with_response_time(15_000);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "primaryAuth",
                "status": "failed",
                "error": "timeout",
                "response_time_ms": 15000
            })
        );

        let back: ProbeResult = serde_json::from_value(value).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_record_never_overwrites() {
        let mut set = ProbeResultSet::new();
        assert!(set.record(ProbeResult::passed(ProbeName::SecondaryModels)));
        assert!(!set.record(ProbeResult::failed(ProbeName::SecondaryModels, "late")));
        assert!(set.passed(ProbeName::SecondaryModels));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_missing_probe_reads_as_skipped() {
        let set = ProbeResultSet::new();
        assert!(set.skipped(ProbeName::PrimaryAuth));
        assert!(!set.passed(ProbeName::PrimaryAuth));
        assert!(!set.failed(ProbeName::PrimaryAuth));
    }

    #[test]
    fn test_skip_missing_completes_set() {
        let mut set: ProbeResultSet = [
            ProbeResult::passed(ProbeName::PrimaryAuth),
            ProbeResult::failed(ProbeName::SecondaryModels, "HTTP 401: nope"),
        ]
        .into_iter()
        .collect();
        assert!(!set.is_complete());

        let filled = set.skip_missing("run cancelled");
        assert_eq!(filled.len(), 4);
        assert_eq!(filled[0], ProbeName::SecondaryChat);
        assert!(set.is_complete());
        assert!(set.passed(ProbeName::PrimaryAuth));
        assert_eq!(
            set.get(ProbeName::UsageStats).unwrap().skip_reason(),
            Some("run cancelled")
        );
        assert_eq!(set.failed_probes(), vec![ProbeName::SecondaryModels]);
    }

    #[test]
    fn test_result_set_serializes_as_map() {
        let set: ProbeResultSet = [ProbeResult::passed(ProbeName::ServiceHealth)]
            .into_iter()
            .collect();
        let value = serde_json::to_value(&set).unwrap();
        assert_eq!(value["serviceHealth"]["status"], "passed");
    }

    #[test]
    fn test_full_run_request_budget() {
        assert_eq!(ProbeName::EndpointAvailability.request_count(), 3);
        assert_eq!(ProbeName::ServiceHealth.request_count(), 1);
        assert_eq!(REQUESTS_PER_RUN, 8);
    }

    #[test]
    fn test_endpoint_check_reachability() {
        assert!(EndpointCheck::answered("/models", HttpMethod::Get, 401).reachable);
        assert!(EndpointCheck::answered("/chat/completions", HttpMethod::Post, 500).reachable);
        assert!(!EndpointCheck::answered("/health", HttpMethod::Get, 404).reachable);
        let down = EndpointCheck::unreachable("/health", HttpMethod::Get, "connection refused");
        assert!(!down.reachable);
        assert_eq!(down.status, None);
    }
}
