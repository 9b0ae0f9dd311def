//! Diagnostic report.
//!
//! A [`Report`] is the terminal artifact of one run: the masked
//! configuration, every probe result, the diagnosis and its
//! recommendations. It is built once and never mutated.
//!
//! # Formats
//!
//! - [`Report::to_json`]: pretty-printed JSON
//! - [`Report::to_text`]: framed plain-text report
//! - [`Report::to_markdown`]: Markdown document
//!
//! [`save_report`] writes the JSON and text renderings to disk.

mod export;
mod render;

pub use export::{report_file_stem, save_report, SavedReport, DEFAULT_REPORT_DIR};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{Config, CredentialCheck};
use crate::diagnostics::{Diagnosis, ProbeResultSet, ProbeRun, Recommendation, Severity};
use crate::error::ExportError;

/// Configuration as shown in reports. Credentials are masked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskedConfig {
    /// Masked primary credential, if one was supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Masked secondary credential.
    pub bearer_token: String,
    /// Service base URL.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Per-probe timeout.
    pub probe_timeout_ms: u64,
}

impl From<&Config> for MaskedConfig {
    fn from(config: &Config) -> Self {
        Self {
            api_key: config.api_key.as_ref().map(|k| k.masked()),
            bearer_token: config.bearer_token.prefix_masked(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            probe_timeout_ms: config.probe_timeout_ms,
        }
    }
}

/// Result of one diagnostic run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Unique report identifier.
    pub report_id: Uuid,
    /// When the report was assembled.
    pub generated_at: DateTime<Utc>,
    /// Configuration used, with credentials masked.
    pub config: MaskedConfig,
    /// Probe results keyed by probe name.
    pub results: ProbeResultSet,
    /// Classification of the results.
    pub diagnosis: Diagnosis,
    /// Ordered recommendations.
    pub recommendations: Vec<Recommendation>,
    /// Format summary of the primary credential.
    pub credential_check: CredentialCheck,
    /// Whether the run was cancelled before every probe finished.
    pub cancelled: bool,
}

impl Report {
    /// Assemble a report.
    #[must_use]
    pub fn assemble(
        config: &Config,
        run: ProbeRun,
        diagnosis: Diagnosis,
        recommendations: Vec<Recommendation>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            report_id: Uuid::new_v4(),
            generated_at,
            config: MaskedConfig::from(config),
            results: run.results,
            diagnosis,
            recommendations,
            credential_check: CredentialCheck::inspect(config.api_key.as_ref()),
            cancelled: run.cancelled,
        }
    }

    /// Severity of the diagnosis.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.diagnosis.severity
    }

    /// Process exit code: 1 for `error` and `critical`, 0 otherwise.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        if self.diagnosis.severity.is_failure() {
            1
        } else {
            0
        }
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Serialize`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ExportError> {
        serde_json::to_string_pretty(self).map_err(|e| ExportError::Serialize {
            message: e.to_string(),
        })
    }

    /// Framed plain-text report.
    #[must_use]
    pub fn to_text(&self) -> String {
        render::text(self)
    }

    /// Markdown report.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        render::markdown(self)
    }
}
