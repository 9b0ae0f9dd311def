//! Recommendation generator.
//!
//! Each scenario maps to a fixed, ordered list of templates. Order is the
//! template order; `priority` is descriptive and never used to sort.

use serde::{Deserialize, Serialize};

use super::classifier::{Diagnosis, Scenario};
use super::probe::ProbeResultSet;
use crate::config::{
    validate_api_key_format, Config, SecretString, API_KEY_LENGTH, DEFAULT_BASE_URL,
};

/// Where subscriptions and API keys are managed.
pub const SUBSCRIPTION_URL: &str = "https://subscription.nillion.com";

/// Client library install command.
pub const SDK_INSTALL_COMMAND: &str = "npm install @nillion/nilai-ts";

/// Recommendation priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Informational.
    Info,
    /// Worth doing.
    Medium,
    /// Do this first.
    High,
    /// Blocking.
    Critical,
}

impl Priority {
    /// Lowercase identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One actionable recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Priority.
    pub priority: Priority,
    /// Short imperative title.
    pub title: String,
    /// Explanation.
    pub description: String,
    /// Concrete command to run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Related link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Extra finding specific to this run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Recommendation {
    /// Create a recommendation.
    #[must_use]
    pub fn new(priority: Priority, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            priority,
            title: title.into(),
            description: description.into(),
            action: None,
            link: None,
            detail: None,
        }
    }

    /// Set the action.
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Set the link.
    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Set the detail.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Generate the recommendations for `diagnosis`. Never returns an empty list.
#[must_use]
pub fn generate(
    diagnosis: &Diagnosis,
    results: &ProbeResultSet,
    config: &Config,
) -> Vec<Recommendation> {
    match diagnosis.scenario {
        Scenario::AllWorking => vec![Recommendation::new(
            Priority::Info,
            "No action required",
            "Your setup is working correctly.",
        )],
        Scenario::PrimaryOnly => vec![Recommendation::new(
            Priority::Info,
            "Continue using SDK authentication",
            "SDK is the recommended method for production use.",
        )],
        Scenario::CredentialIssue => credential_issue(config),
        Scenario::AuthenticationFailure => authentication_failure(config),
        Scenario::ServiceDown => vec![
            Recommendation::new(
                Priority::Critical,
                "Wait and retry",
                "Service may be temporarily unavailable. Try again in a few minutes.",
            ),
            Recommendation::new(
                Priority::High,
                "Check service status",
                "Visit Nillion status page or contact support",
            ),
        ],
        Scenario::NoCredential => vec![Recommendation::new(
            Priority::Info,
            "Provide API key for full testing",
            "Add your API key to test SDK authentication",
        )
        .with_link(SUBSCRIPTION_URL)],
        Scenario::Unknown => {
            let review = Recommendation::new(
                Priority::Medium,
                "Review detailed test results",
                "Check individual test results for more information",
            );
            let failed: Vec<_> = results
                .failed_probes()
                .into_iter()
                .map(|name| name.as_str())
                .collect();
            if failed.is_empty() {
                vec![review]
            } else {
                vec![review.with_detail(format!("Failed probes: {}", failed.join(", ")))]
            }
        }
    }
}

/// The format check runs again here; the key may never have been validated.
fn credential_issue(config: &Config) -> Vec<Recommendation> {
    let key = config.api_key.as_ref().map_or("", SecretString::expose);

    let mut format = Recommendation::new(
        Priority::High,
        "Verify API key format",
        format!("Ensure your API key is exactly {API_KEY_LENGTH} hexadecimal characters."),
    );
    if let Err(e) = validate_api_key_format(key) {
        let length = key.trim().chars().count();
        format = format.with_detail(format!("{e} (your key length: {length} characters)"));
    }

    vec![
        format,
        Recommendation::new(
            Priority::High,
            "Check subscription status",
            format!("Visit {SUBSCRIPTION_URL} to verify your subscription is active."),
        )
        .with_link(SUBSCRIPTION_URL),
        Recommendation::new(
            Priority::Medium,
            "Verify API key source",
            "Ensure you copied the key correctly from the subscription portal.",
        ),
        Recommendation::new(
            Priority::Medium,
            "Check SDK installation",
            format!("Run: {SDK_INSTALL_COMMAND}"),
        )
        .with_action(SDK_INSTALL_COMMAND),
    ]
}

fn authentication_failure(config: &Config) -> Vec<Recommendation> {
    let host = reqwest::Url::parse(&config.base_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| config.base_url.clone());

    vec![
        Recommendation::new(
            Priority::High,
            "Check network connectivity",
            format!("Verify you can reach {host}"),
        ),
        Recommendation::new(
            Priority::High,
            "Verify base URL",
            format!("Ensure using correct endpoint: {DEFAULT_BASE_URL}/"),
        )
        .with_detail(format!("Configured: {}", config.base_url)),
        Recommendation::new(
            Priority::Medium,
            "Check for service announcements",
            "Visit Nillion status page or community channels",
        ),
    ]
}
