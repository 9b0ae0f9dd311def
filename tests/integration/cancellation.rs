//! Cancellation yields a partial, classified report.

use std::time::Duration;

use nilai_diagnostics::diagnostics::{
    run_diagnostics_with_cancel, ProbeName, CANCELLED_REASON,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{config_for, mount_service, ServiceBehavior, API_KEY};

#[tokio::test]
async fn test_cancel_during_first_probe_skips_everything() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"choices": [{"message": {"content": "ok"}}]}))
                .set_delay(Duration::from_secs(5)),
        )
        .with_priority(1)
        .mount(&server)
        .await;
    mount_service(&server, ServiceBehavior::healthy()).await;

    let config = config_for(&server, Some(API_KEY));
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let report = run_diagnostics_with_cancel(&config, &cancel).await.unwrap();

    assert!(report.cancelled);
    assert!(report.results.is_complete());
    for name in ProbeName::ALL {
        let result = report.results.get(name).unwrap();
        assert_eq!(result.skip_reason(), Some(CANCELLED_REASON), "{name}");
    }
    // A partial report is still classified and carries recommendations.
    assert!(!report.recommendations.is_empty());
    assert!(report.to_text().contains("SKIPPED"));
}

#[tokio::test]
async fn test_cancel_before_start_sends_no_requests() {
    let server = MockServer::start().await;
    mount_service(&server, ServiceBehavior::healthy()).await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = run_diagnostics_with_cancel(&config_for(&server, Some(API_KEY)), &cancel)
        .await
        .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.results.len(), ProbeName::ALL.len());
    assert!(server.received_requests().await.unwrap().is_empty());
}
