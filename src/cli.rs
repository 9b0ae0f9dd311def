//! Command-line surface.
//!
//! ```text
//! nilai-diagnostics [API_KEY] [--bearer-token T] [--base-url U] [--model M]
//!                   [--timeout-ms N] [--json | --markdown] [--save]
//!                   [--output-dir D] [--verbose | --quiet]
//! ```

use std::path::PathBuf;

use clap::Parser;

use crate::config::ConfigOverrides;
use crate::error::ExportError;
use crate::report::{Report, DEFAULT_REPORT_DIR};

/// Exit code for an invalid configuration.
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Credential diagnostics for the Nil AI API.
///
/// Runs a fixed battery of authentication and connectivity probes, then
/// prints a diagnosis with recommendations. Exits 1 when the diagnosis is
/// `error` or `critical`, 2 on configuration errors.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "nilai-diagnostics", version, about)]
pub struct Cli {
    /// Primary credential (API key). Falls back to `NILAI_API_KEY`.
    #[arg(value_name = "API_KEY")]
    pub api_key: Option<String>,

    /// Secondary credential (legacy bearer token).
    #[arg(long, value_name = "TOKEN")]
    pub bearer_token: Option<String>,

    /// Service base URL.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Model used by chat probes.
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Per-probe timeout in milliseconds.
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Print the report as JSON.
    #[arg(long, conflicts_with = "markdown")]
    pub json: bool,

    /// Print the report as Markdown.
    #[arg(long)]
    pub markdown: bool,

    /// Save JSON and text reports to the output directory.
    #[arg(long)]
    pub save: bool,

    /// Directory for saved reports.
    #[arg(long, value_name = "DIR", env = "NILAI_REPORT_DIR", default_value = DEFAULT_REPORT_DIR)]
    pub output_dir: PathBuf,

    /// Log at debug level.
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Log warnings and errors only.
    #[arg(short, long)]
    pub quiet: bool,
}

/// How the report is printed to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Framed plain text.
    Text,
    /// Pretty JSON.
    Json,
    /// Markdown.
    Markdown,
}

impl Cli {
    /// Values that override the environment.
    #[must_use]
    pub fn to_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_key: self.api_key.clone(),
            bearer_token: self.bearer_token.clone(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            probe_timeout_ms: self.timeout_ms,
        }
    }

    /// Selected output format.
    #[must_use]
    pub const fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.markdown {
            OutputFormat::Markdown
        } else {
            OutputFormat::Text
        }
    }

    /// Log filter directive, given `Config::log_level`.
    #[must_use]
    pub fn log_filter(&self, configured: &str) -> String {
        if self.verbose {
            "debug".to_string()
        } else if self.quiet {
            "warn".to_string()
        } else {
            configured.to_string()
        }
    }
}

/// Render `report` in `format`.
///
/// # Errors
///
/// Returns [`ExportError::Serialize`] if JSON serialization fails.
pub fn render(report: &Report, format: OutputFormat) -> Result<String, ExportError> {
    match format {
        OutputFormat::Text => Ok(report.to_text()),
        OutputFormat::Json => report.to_json(),
        OutputFormat::Markdown => Ok(report.to_markdown()),
    }
}
