//! Saving reports to disk.

use nilai_diagnostics::diagnostics::run_diagnostics;
use nilai_diagnostics::report::{report_file_stem, save_report, Report};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use wiremock::MockServer;

use super::{config_for, mount_service, ServiceBehavior, API_KEY};

#[tokio::test]
async fn test_saved_report_reads_back() {
    let server = MockServer::start().await;
    mount_service(&server, ServiceBehavior::healthy()).await;
    let report = run_diagnostics(&config_for(&server, Some(API_KEY)))
        .await
        .unwrap();

    let dir = TempDir::new().unwrap();
    let target = dir.path().join("nested").join("reports");
    let saved = save_report(&report, &target).unwrap();

    let stem = report_file_stem(&report);
    assert_eq!(saved.json_path, target.join(format!("{stem}.json")));
    assert_eq!(saved.text_path, target.join(format!("{stem}.txt")));

    let json = std::fs::read_to_string(&saved.json_path).unwrap();
    let parsed: Report = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, report);

    let text = std::fs::read_to_string(&saved.text_path).unwrap();
    assert_eq!(text.trim_end(), report.to_text().trim_end());
    assert!(!text.contains(API_KEY));
}

#[test]
fn test_save_into_file_path_fails() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "x").unwrap();

    let report = serde_json::from_value::<Report>(serde_json::json!({
        "report_id": "6f1c2b9e-8a41-4f7e-9d55-0c3a7e2b1d44",
        "generated_at": "2026-03-14T09:26:53Z",
        "config": {
            "bearer_token": "Nillion2...",
            "base_url": "https://example.invalid/v1",
            "model": "m",
            "probe_timeout_ms": 15000
        },
        "results": {},
        "diagnosis": {
            "scenario": "UNKNOWN",
            "code": "UNKNOWN",
            "severity": "warning",
            "title": "Unknown Issue",
            "description": "Unable to determine the issue"
        },
        "recommendations": [],
        "credential_check": {"provided": false, "length": 0, "format": "Not provided"},
        "cancelled": false
    }))
    .unwrap();

    assert!(save_report(&report, &blocker).is_err());
}
