//! Report export to disk.

use std::path::{Path, PathBuf};

use super::Report;
use crate::error::ExportError;

/// Default directory for saved reports.
pub const DEFAULT_REPORT_DIR: &str = "diagnostic-reports";

/// Paths written by [`save_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedReport {
    /// JSON rendering.
    pub json_path: PathBuf,
    /// Text rendering.
    pub text_path: PathBuf,
}

/// File name stem for a report: `diagnostic-<timestamp>`.
///
/// The timestamp uses `-` instead of `:` so it is valid on every filesystem.
#[must_use]
pub fn report_file_stem(report: &Report) -> String {
    format!(
        "diagnostic-{}",
        report.generated_at.format("%Y-%m-%dT%H-%M-%S")
    )
}

/// Write the JSON and text renderings of `report` into `dir`.
///
/// The directory is created if it does not exist.
///
/// # Errors
///
/// Returns [`ExportError`] if serialization or any filesystem operation fails.
pub fn save_report(report: &Report, dir: &Path) -> Result<SavedReport, ExportError> {
    std::fs::create_dir_all(dir).map_err(|e| io_error(dir, &e))?;

    let stem = report_file_stem(report);
    let json_path = dir.join(format!("{stem}.json"));
    let text_path = dir.join(format!("{stem}.txt"));

    std::fs::write(&json_path, report.to_json()?).map_err(|e| io_error(&json_path, &e))?;
    std::fs::write(&text_path, report.to_text()).map_err(|e| io_error(&text_path, &e))?;

    tracing::info!(
        json = %json_path.display(),
        text = %text_path.display(),
        "Report saved"
    );

    Ok(SavedReport {
        json_path,
        text_path,
    })
}

fn io_error(path: &Path, error: &std::io::Error) -> ExportError {
    ExportError::Io {
        path: path.display().to_string(),
        message: error.to_string(),
    }
}
