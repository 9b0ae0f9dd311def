//! End-to-end classification over HTTP.

use std::time::Duration;

use nilai_diagnostics::config::Config;
use nilai_diagnostics::diagnostics::{
    run_diagnostics, DiagnosticService, ProbeName, Scenario, Severity, NO_CREDENTIAL_REASON,
    REQUESTS_PER_RUN,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{config_for, mount_service, ServiceBehavior, API_KEY};

#[tokio::test]
async fn test_rejected_key_with_working_token_is_credential_issue() {
    let server = MockServer::start().await;
    mount_service(
        &server,
        ServiceBehavior {
            primary_status: 401,
            ..ServiceBehavior::healthy()
        },
    )
    .await;

    let report = run_diagnostics(&config_for(&server, Some(API_KEY)))
        .await
        .unwrap();

    assert_eq!(report.diagnosis.scenario, Scenario::CredentialIssue);
    assert_eq!(report.severity(), Severity::Error);
    assert_eq!(report.exit_code(), 1);
    assert_eq!(report.recommendations.len(), 4);
    assert_eq!(report.recommendations[0].title, "Verify API key format");
    // A well-formed key carries no format detail.
    assert!(report.recommendations[0].detail.is_none());

    let primary = report.results.get(ProbeName::PrimaryAuth).unwrap();
    assert!(primary.is_failed());
    assert!(primary.error().unwrap().contains("status 401"));
    assert!(report.results.passed(ProbeName::SecondaryModels));
    assert!(report.results.is_complete());
}

#[tokio::test]
async fn test_no_key_and_failing_token_is_no_credential() {
    let server = MockServer::start().await;
    mount_service(
        &server,
        ServiceBehavior {
            models_status: 401,
            ..ServiceBehavior::healthy()
        },
    )
    .await;

    let report = run_diagnostics(&config_for(&server, None)).await.unwrap();

    assert_eq!(report.diagnosis.scenario, Scenario::NoCredential);
    assert_eq!(report.severity(), Severity::Warning);
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.recommendations.len(), 1);
    assert_eq!(
        report
            .results
            .get(ProbeName::PrimaryAuth)
            .unwrap()
            .skip_reason(),
        Some(NO_CREDENTIAL_REASON)
    );
    assert!(report.results.skipped(ProbeName::UsageStats));
    assert!(report.config.api_key.is_none());
}

#[tokio::test]
async fn test_everything_healthy_is_all_working() {
    let server = MockServer::start().await;
    mount_service(&server, ServiceBehavior::healthy()).await;

    let report = run_diagnostics(&config_for(&server, Some(API_KEY)))
        .await
        .unwrap();

    assert_eq!(report.diagnosis.scenario, Scenario::AllWorking);
    assert_eq!(report.severity(), Severity::Success);
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.recommendations.len(), 1);
    assert!(!report.cancelled);

    // The secondary credential is not expected to work for chat.
    assert!(report.results.failed(ProbeName::SecondaryChat));
    assert!(report.results.passed(ProbeName::EndpointAvailability));
    assert!(report.results.passed(ProbeName::UsageStats));

    let primary = report.results.get(ProbeName::PrimaryAuth).unwrap();
    assert_eq!(
        primary.payload.as_ref().unwrap()["model"],
        json!("google/gemma-3-27b-it")
    );
    assert!(primary.response_time_ms.is_some());

    let models = report.results.get(ProbeName::SecondaryModels).unwrap();
    assert_eq!(models.payload.as_ref().unwrap()["count"], json!(2));

    // Credentials never appear unmasked.
    let json = report.to_json().unwrap();
    assert!(!json.contains(API_KEY));
    assert!(json.contains("9f86d081...b0f00a08"));
}

#[tokio::test]
async fn test_unhealthy_service_is_service_down() {
    let server = MockServer::start().await;
    mount_service(
        &server,
        ServiceBehavior {
            primary_status: 500,
            models_status: 500,
            health_status: 503,
        },
    )
    .await;

    let report = run_diagnostics(&config_for(&server, Some(API_KEY)))
        .await
        .unwrap();

    assert_eq!(report.diagnosis.scenario, Scenario::ServiceDown);
    assert_eq!(report.severity(), Severity::Critical);
    assert_eq!(report.exit_code(), 1);
    assert_eq!(report.recommendations.len(), 2);
    assert_eq!(report.recommendations[0].title, "Wait and retry");
    assert!(report
        .results
        .get(ProbeName::ServiceHealth)
        .unwrap()
        .error()
        .unwrap()
        .starts_with("HTTP 503"));
}

#[tokio::test]
async fn test_unreachable_host_is_service_down() {
    let config = Config {
        base_url: "http://127.0.0.1:9/v1".to_string(),
        probe_timeout_ms: 2_000,
        ..Config::default()
    };

    let report = run_diagnostics(&config).await.unwrap();

    assert_eq!(report.diagnosis.scenario, Scenario::ServiceDown);
    assert!(report.results.failed(ProbeName::ServiceHealth));
    assert!(report.results.failed(ProbeName::EndpointAvailability));
    assert!(report.results.is_complete());
}

#[tokio::test]
async fn test_slow_probe_records_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "ok"}))
                .set_delay(Duration::from_millis(2_500)),
        )
        .with_priority(1)
        .mount(&server)
        .await;
    mount_service(&server, ServiceBehavior::healthy()).await;

    let config = Config {
        probe_timeout_ms: 1_000,
        ..config_for(&server, None)
    };
    let report = run_diagnostics(&config).await.unwrap();

    let health = report.results.get(ProbeName::ServiceHealth).unwrap();
    assert_eq!(health.error(), Some("timeout"));
    // Later probes still run after a timeout.
    assert!(report.results.passed(ProbeName::UsageStats));
    assert!(!report.cancelled);
}

#[tokio::test]
async fn test_one_service_stays_healthy_across_runs() {
    let server = MockServer::start().await;
    mount_service(&server, ServiceBehavior::healthy()).await;

    let config = config_for(&server, Some(API_KEY));
    let service = DiagnosticService::from_config(&config).unwrap();
    let cancel = CancellationToken::new();

    let runs: usize = 3;
    for _ in 0..runs {
        let report = service.run(&config, &cancel).await.unwrap();
        assert_eq!(report.diagnosis.scenario, Scenario::AllWorking);
        assert!(report.results.passed(ProbeName::ServiceHealth));
        assert!(ProbeName::ALL
            .iter()
            .all(|name| !report.results.skipped(*name)));
    }

    let sent = server.received_requests().await.unwrap().len();
    assert_eq!(sent, usize::try_from(REQUESTS_PER_RUN).unwrap() * runs);
}
