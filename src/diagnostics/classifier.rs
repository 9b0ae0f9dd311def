//! Diagnosis classifier.
//!
//! Maps a completed [`ProbeResultSet`] to exactly one [`Diagnosis`] through
//! an ordered rule table. Rules are evaluated top to bottom and the first
//! match wins, so [`RULES`] order is behavior: a set where both credentials
//! pass is `ALL_WORKING` even when the health probe failed.

use serde::{Deserialize, Serialize};

use super::probe::{ProbeName, ProbeResultSet};

/// Diagnosis scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scenario {
    /// Both credentials work.
    AllWorking,
    /// Primary credential works, secondary does not.
    PrimaryOnly,
    /// Secondary credential works, primary is missing or rejected.
    CredentialIssue,
    /// Service is healthy but every credential fails.
    AuthenticationFailure,
    /// Service health check failed.
    ServiceDown,
    /// No primary credential and the secondary failed.
    NoCredential,
    /// No rule matched.
    Unknown,
}

impl Scenario {
    /// Scenario identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AllWorking => "ALL_WORKING",
            Self::PrimaryOnly => "PRIMARY_ONLY",
            Self::CredentialIssue => "CREDENTIAL_ISSUE",
            Self::AuthenticationFailure => "AUTHENTICATION_FAILURE",
            Self::ServiceDown => "SERVICE_DOWN",
            Self::NoCredential => "NO_CREDENTIAL",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Legacy code used by earlier report consumers.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::PrimaryOnly => "SDK_ONLY",
            Self::CredentialIssue => "API_KEY_ISSUE",
            Self::NoCredential => "NO_API_KEY",
            other => other.as_str(),
        }
    }

    /// Fixed severity of this scenario.
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::AllWorking => Severity::Success,
            Self::PrimaryOnly => Severity::Info,
            Self::CredentialIssue | Self::AuthenticationFailure => Severity::Error,
            Self::ServiceDown => Severity::Critical,
            Self::NoCredential | Self::Unknown => Severity::Warning,
        }
    }

    /// User-facing title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::AllWorking => "All Systems Operational",
            Self::PrimaryOnly => "SDK Authentication Working",
            Self::CredentialIssue => "API Key Authentication Failed",
            Self::AuthenticationFailure => "Complete Authentication Failure",
            Self::ServiceDown => "Service Unavailable",
            Self::NoCredential => "No API Key Provided",
            Self::Unknown => "Inconclusive Results",
        }
    }

    /// User-facing description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AllWorking => "Both SDK and bearer token authentication are working correctly.",
            Self::PrimaryOnly => "SDK authentication works. Bearer token limitations are expected.",
            Self::CredentialIssue => "Bearer token works but API key fails. This indicates an issue with your API key or subscription.",
            Self::AuthenticationFailure => "Service is healthy but all authentication methods fail.",
            Self::ServiceDown => "The Nillion API service appears to be down or unreachable.",
            Self::NoCredential => "Cannot test SDK authentication without an API key. Bearer token test only.",
            Self::Unknown => "Unable to determine exact issue. Review detailed test results.",
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordinal severity: `success < info < warning < error < critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Everything works.
    Success,
    /// Works, with expected limitations.
    Info,
    /// Incomplete or inconclusive.
    Warning,
    /// Credential problem.
    Error,
    /// Service unavailable.
    Critical,
}

impl Severity {
    /// Lowercase identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }

    /// Returns true for `error` and `critical`.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Error | Self::Critical)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnosis {
    /// Matched scenario.
    pub scenario: Scenario,
    /// Legacy code for `scenario`, see [`Scenario::code`].
    pub code: String,
    /// Severity of the scenario.
    pub severity: Severity,
    /// Fixed title.
    pub title: String,
    /// Fixed description.
    pub description: String,
}

impl Diagnosis {
    /// The diagnosis for `scenario`.
    #[must_use]
    pub fn for_scenario(scenario: Scenario) -> Self {
        Self {
            scenario,
            code: scenario.code().to_string(),
            severity: scenario.severity(),
            title: scenario.title().to_string(),
            description: scenario.description().to_string(),
        }
    }
}

/// One row of the decision table.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Scenario produced when the predicate holds.
    pub scenario: Scenario,
    /// Condition over the result set.
    pub predicate: fn(&ProbeResultSet) -> bool,
}

const PRIMARY: ProbeName = ProbeName::PrimaryAuth;
const SECONDARY: ProbeName = ProbeName::SecondaryModels;
const HEALTH: ProbeName = ProbeName::ServiceHealth;

fn all_working(r: &ProbeResultSet) -> bool {
    r.passed(PRIMARY) && r.passed(SECONDARY)
}

fn primary_only(r: &ProbeResultSet) -> bool {
    r.passed(PRIMARY) && !r.passed(SECONDARY)
}

fn credential_issue(r: &ProbeResultSet) -> bool {
    (r.skipped(PRIMARY) || !r.passed(PRIMARY)) && r.passed(SECONDARY)
}

// A skipped primary is not a failed one: that case belongs to NO_CREDENTIAL.
fn authentication_failure(r: &ProbeResultSet) -> bool {
    r.failed(PRIMARY) && !r.passed(SECONDARY) && r.passed(HEALTH)
}

fn service_down(r: &ProbeResultSet) -> bool {
    !r.passed(HEALTH)
}

fn no_credential(r: &ProbeResultSet) -> bool {
    r.skipped(PRIMARY) && !r.passed(SECONDARY)
}

const fn fallback(_: &ProbeResultSet) -> bool {
    true
}

/// Decision table in evaluation order.
pub const RULES: [Rule; 7] = [
    Rule {
        scenario: Scenario::AllWorking,
        predicate: all_working,
    },
    Rule {
        scenario: Scenario::PrimaryOnly,
        predicate: primary_only,
    },
    Rule {
        scenario: Scenario::CredentialIssue,
        predicate: credential_issue,
    },
    Rule {
        scenario: Scenario::AuthenticationFailure,
        predicate: authentication_failure,
    },
    Rule {
        scenario: Scenario::ServiceDown,
        predicate: service_down,
    },
    Rule {
        scenario: Scenario::NoCredential,
        predicate: no_credential,
    },
    Rule {
        scenario: Scenario::Unknown,
        predicate: fallback,
    },
];

/// Classify a result set. Pure and total.
#[must_use]
pub fn classify(results: &ProbeResultSet) -> Diagnosis {
    let scenario = RULES
        .iter()
        .find(|rule| (rule.predicate)(results))
        .map_or(Scenario::Unknown, |rule| rule.scenario);
    Diagnosis::for_scenario(scenario)
}
