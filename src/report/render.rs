//! Text and Markdown rendering.

use std::fmt::Write as _;

use super::Report;
use crate::diagnostics::{ProbeName, ProbeResult, ProbeStatus};

const WIDTH: usize = 70;

fn heavy_rule() -> String {
    "═".repeat(WIDTH)
}

fn light_rule() -> String {
    "─".repeat(WIDTH)
}

/// One-word verdict for a probe in the summary.
fn verdict(name: ProbeName, result: Option<&ProbeResult>) -> &'static str {
    match (name, result.map(|r| &r.status)) {
        (ProbeName::ServiceHealth, Some(ProbeStatus::Passed)) => "HEALTHY",
        (ProbeName::ServiceHealth, Some(ProbeStatus::Failed { .. })) => "DOWN",
        (_, Some(ProbeStatus::Passed)) => "PASS",
        (_, Some(ProbeStatus::Failed { .. })) => "FAIL",
        (_, Some(ProbeStatus::Skipped { .. }) | None) => "SKIPPED",
    }
}

/// Trailing annotation: timing, error or skip reason.
fn annotation(result: Option<&ProbeResult>) -> String {
    let Some(result) = result else {
        return String::new();
    };
    match &result.status {
        ProbeStatus::Passed => result
            .response_time_ms
            .map(|ms| format!(" ({ms}ms)"))
            .unwrap_or_default(),
        ProbeStatus::Failed { error } => format!(" - {error}"),
        ProbeStatus::Skipped { reason } => format!(" - {reason}"),
    }
}

// `writeln!` into a `String` cannot fail.
pub(super) fn text(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", heavy_rule());
    let _ = writeln!(out, "NILLION API DIAGNOSTIC REPORT");
    let _ = writeln!(out, "{}", heavy_rule());
    let _ = writeln!(out);
    let _ = writeln!(out, "Report ID: {}", report.report_id);
    let _ = writeln!(out, "Generated: {}", report.generated_at.to_rfc3339());
    let _ = writeln!(out, "Base URL: {}", report.config.base_url);
    let _ = writeln!(out, "Model: {}", report.config.model);
    let _ = writeln!(
        out,
        "API Key: {}",
        report.config.api_key.as_deref().unwrap_or("not provided")
    );
    let _ = writeln!(out, "Bearer Token: {}", report.config.bearer_token);
    if report.cancelled {
        let _ = writeln!(out, "Run cancelled: results are partial");
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "DIAGNOSIS");
    let _ = writeln!(out, "{}", light_rule());
    let _ = writeln!(out, "Status: {}", report.diagnosis.title);
    let _ = writeln!(
        out,
        "Severity: {}",
        report.diagnosis.severity.as_str().to_uppercase()
    );
    let _ = writeln!(out, "Description: {}", report.diagnosis.description);
    let _ = writeln!(out);

    let _ = writeln!(out, "TEST RESULTS SUMMARY");
    let _ = writeln!(out, "{}", light_rule());
    for name in ProbeName::ALL {
        let result = report.results.get(name);
        let _ = writeln!(
            out,
            "{}: {}{}",
            name.label(),
            verdict(name, result),
            annotation(result)
        );
    }
    let _ = writeln!(
        out,
        "API Key Format: {}",
        report.credential_check.format
    );
    let _ = writeln!(out);

    if !report.recommendations.is_empty() {
        let _ = writeln!(out, "RECOMMENDATIONS");
        let _ = writeln!(out, "{}", light_rule());
        for (i, rec) in report.recommendations.iter().enumerate() {
            let _ = writeln!(
                out,
                "{}. [{}] {}",
                i + 1,
                rec.priority.as_str().to_uppercase(),
                rec.title
            );
            let _ = writeln!(out, "   {}", rec.description);
            if let Some(action) = &rec.action {
                let _ = writeln!(out, "   Command: {action}");
            }
            if let Some(link) = &rec.link {
                let _ = writeln!(out, "   URL: {link}");
            }
            if let Some(detail) = &rec.detail {
                let _ = writeln!(out, "   Note: {detail}");
            }
            let _ = writeln!(out);
        }
    }

    let _ = writeln!(out, "{}", heavy_rule());
    let _ = writeln!(out, "End of Report");
    let _ = write!(out, "{}", heavy_rule());
    out
}

pub(super) fn markdown(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Nillion API Diagnostic Report");
    let _ = writeln!(out);
    let _ = writeln!(out, "- **Report ID:** `{}`", report.report_id);
    let _ = writeln!(out, "- **Generated:** {}", report.generated_at.to_rfc3339());
    let _ = writeln!(out, "- **Base URL:** {}", report.config.base_url);
    let _ = writeln!(out, "- **Model:** {}", report.config.model);
    let _ = writeln!(
        out,
        "- **API Key:** {}",
        report.config.api_key.as_deref().unwrap_or("not provided")
    );
    if report.cancelled {
        let _ = writeln!(out, "- **Run cancelled:** results are partial");
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "## Diagnosis");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "**{}** (`{}`, severity `{}`)",
        report.diagnosis.title, report.diagnosis.scenario, report.diagnosis.severity
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", report.diagnosis.description);
    let _ = writeln!(out);

    let _ = writeln!(out, "## Probe Results");
    let _ = writeln!(out);
    let _ = writeln!(out, "| Probe | Status | Time | Detail |");
    let _ = writeln!(out, "|---|---|---|---|");
    for name in ProbeName::ALL {
        let result = report.results.get(name);
        let time = result
            .and_then(|r| r.response_time_ms)
            .map(|ms| format!("{ms}ms"))
            .unwrap_or_default();
        let detail = result
            .and_then(|r| r.error().or_else(|| r.skip_reason()))
            .unwrap_or_default()
            .replace('|', "\\|");
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} |",
            name.label(),
            verdict(name, result),
            time,
            detail
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "## Recommendations");
    let _ = writeln!(out);
    for (i, rec) in report.recommendations.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. **{}** _({})_: {}",
            i + 1,
            rec.title,
            rec.priority,
            rec.description
        );
        if let Some(action) = &rec.action {
            let _ = writeln!(out, "   - Run `{action}`");
        }
        if let Some(link) = &rec.link {
            let _ = writeln!(out, "   - <{link}>");
        }
        if let Some(detail) = &rec.detail {
            let _ = writeln!(out, "   - {detail}");
        }
    }
    out
}
