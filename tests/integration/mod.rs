//! Integration tests for the diagnostics toolkit.
//!
//! These tests verify end-to-end workflows including:
//! - Scenario classification over real HTTP
//! - Cancellation and probe timeouts
//! - Report export

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod cancellation;
mod report_export;
mod scenarios;

use nilai_diagnostics::config::{Config, SecretString, DEFAULT_BEARER_TOKEN};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A 64-character hex key that passes format validation.
pub const API_KEY: &str = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";

/// How the mock service answers.
#[derive(Debug, Clone, Copy)]
pub struct ServiceBehavior {
    /// Status for the primary-credential chat call.
    pub primary_status: u16,
    /// Status for the bearer models listing.
    pub models_status: u16,
    /// Status for the health endpoint.
    pub health_status: u16,
}

impl ServiceBehavior {
    pub const fn healthy() -> Self {
        Self {
            primary_status: 200,
            models_status: 200,
            health_status: 200,
        }
    }
}

/// Config pointing at `server`, with an optional primary credential.
pub fn config_for(server: &MockServer, api_key: Option<&str>) -> Config {
    Config {
        api_key: api_key.map(SecretString::new),
        base_url: format!("{}/v1", server.uri()),
        probe_timeout_ms: 2_000,
        ..Config::default()
    }
}

fn json_or_error(status: u16, body: serde_json::Value) -> ResponseTemplate {
    if (200..300).contains(&status) {
        ResponseTemplate::new(status).set_body_json(body)
    } else {
        ResponseTemplate::new(status)
            .set_body_json(json!({"error": {"message": format!("status {status}")}}))
    }
}

/// Mount every endpoint the probes touch.
pub async fn mount_service(server: &MockServer, behavior: ServiceBehavior) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", format!("Bearer {API_KEY}").as_str()))
        .respond_with(json_or_error(
            behavior.primary_status,
            json!({
                "choices": [{"message": {"role": "assistant", "content": "Connection successful!"}}],
                "model": "google/gemma-3-27b-it",
                "usage": {"prompt_tokens": 18, "completion_tokens": 3, "total_tokens": 21}
            }),
        ))
        .mount(server)
        .await;

    let bearer = format!("Bearer {DEFAULT_BEARER_TOKEN}");
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", bearer.as_str()))
        .respond_with(json_or_error(401, json!({})))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(json_or_error(
            behavior.models_status,
            json!([{"id": "google/gemma-3-27b-it"}, {"id": "meta-llama/Llama-3.1-8B-Instruct"}]),
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(json_or_error(
            behavior.health_status,
            json!({"status": "ok", "uptime": "12 days"}),
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/usage"))
        .respond_with(json_or_error(
            200,
            json!({"queries": 41, "total_tokens": 9000, "prompt_tokens": 6000, "completion_tokens": 3000}),
        ))
        .mount(server)
        .await;

    // Root-level paths probed by the endpoint-availability check.
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401))
        .mount(server)
        .await;
}
