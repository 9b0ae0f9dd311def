//! HTTP transport for the probes.
//!
//! This module provides:
//! - [`HttpProbeClient`], the `reqwest` implementation of [`ProbeClient`]
//! - Status-code classification into [`ProbeError`]
//!
//! Every call sends exactly one request. Rate limiting happens in the
//! runner, never here, so a local refusal cannot look like a remote failure.

#![allow(clippy::missing_errors_doc)]

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::config::ClientConfig;
use super::types::{
    parse_model_list, ChatOutcome, ChatRequest, ChatResponse, EndpointSpec, HealthStatus,
    HttpMethod, ModelInfo, ModelsOutcome, SecondaryEndpoint, UsageStats,
};
use crate::config::Config;
use crate::error::ProbeError;
use crate::traits::ProbeClient;

/// Fallback for a 429 without a parseable `retry-after` header.
const DEFAULT_RETRY_AFTER_SECONDS: u64 = 60;

/// `reqwest`-backed probe client.
#[derive(Debug)]
pub struct HttpProbeClient {
    client: Client,
    config: ClientConfig,
}

impl HttpProbeClient {
    /// Create a new probe client.
    ///
    /// `config.timeout_ms` is the transport default; each request is bounded
    /// by the probe timeout of the [`Config`] it is sent with.
    pub fn new(config: ClientConfig) -> Result<Self, ProbeError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ProbeError::Network {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self { client, config })
    }

    /// Create a client sized from the run configuration.
    pub fn from_config(config: &Config) -> Result<Self, ProbeError> {
        Self::new(ClientConfig::from_run_config(config))
    }

    /// Get the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send one request bounded by `timeout`.
    async fn send(
        &self,
        request: RequestBuilder,
        url: &str,
        timeout: Duration,
    ) -> Result<Response, ProbeError> {
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        let start = Instant::now();
        tracing::debug!(url = %url, timeout_ms, "Sending probe request");

        let response = request.timeout(timeout).send().await.map_err(|e| {
            let elapsed_ms = elapsed_ms(start);
            if e.is_timeout() {
                tracing::error!(url = %url, elapsed_ms, "Probe request timed out");
                ProbeError::Timeout { timeout_ms }
            } else {
                tracing::error!(url = %url, elapsed_ms, error = %e, "Probe request failed");
                ProbeError::Network {
                    message: e.to_string(),
                }
            }
        })?;

        tracing::debug!(
            url = %url,
            status = %response.status(),
            elapsed_ms = elapsed_ms(start),
            "Probe response received"
        );
        Ok(response)
    }

    /// Map non-success statuses to errors, passing successful responses through.
    async fn check_status(&self, response: Response) -> Result<Response, ProbeError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_seconds = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECONDS);
            return Err(ProbeError::RateLimited {
                retry_after_seconds,
            });
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body);

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ProbeError::AuthenticationFailed {
                message: if message.is_empty() {
                    status.to_string()
                } else {
                    message
                },
            });
        }

        Err(ProbeError::HttpStatus {
            status: status.as_u16(),
            body: truncate_chars(&message, self.config.body_preview_chars),
        })
    }

    /// Decode a JSON body, reporting malformed payloads as `UnexpectedResponse`.
    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ProbeError> {
        response
            .json()
            .await
            .map_err(|e| ProbeError::UnexpectedResponse {
                message: format!("Failed to parse response: {e}"),
            })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        bearer: Option<&str>,
        timeout: Duration,
    ) -> Result<T, ProbeError> {
        let mut request = self
            .client
            .get(url)
            .header("accept", "application/json");
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        let response = self.send(request, url, timeout).await?;
        let response = self.check_status(response).await?;
        Self::read_json(response).await
    }

    async fn chat(
        &self,
        url: &str,
        token: &str,
        request: &ChatRequest,
        timeout: Duration,
    ) -> Result<ChatOutcome, ProbeError> {
        let builder = self
            .client
            .post(url)
            .bearer_auth(token)
            .header("accept", "application/json")
            .json(request);
        let response = self.send(builder, url, timeout).await?;
        let response = self.check_status(response).await?;
        let body: ChatResponse = Self::read_json(response).await?;

        let reply = body
            .first_reply()
            .ok_or_else(|| ProbeError::UnexpectedResponse {
                message: "Invalid response format from API".to_string(),
            })?;

        Ok(ChatOutcome {
            response: reply,
            model: body.model.unwrap_or_else(|| request.model.clone()),
            usage: body.usage,
        })
    }

    async fn list_models(&self, config: &Config) -> Result<ModelsOutcome, ProbeError> {
        let url = format!("{}/models", config.api_url());
        let body: Value = self
            .get_json(
                &url,
                Some(config.bearer_token.expose()),
                config.probe_timeout(),
            )
            .await?;

        let models = parse_model_list(&body).ok_or_else(|| ProbeError::UnexpectedResponse {
            message: "Expected a model list".to_string(),
        })?;
        if models.is_empty() {
            return Err(ProbeError::UnexpectedResponse {
                message: "No models returned".to_string(),
            });
        }

        Ok(ModelsOutcome {
            count: models.len(),
            models: models.iter().map(ModelInfo::label).map(String::from).collect(),
        })
    }
}

#[async_trait]
impl ProbeClient for HttpProbeClient {
    async fn primary_auth(&self, config: &Config) -> Result<ChatOutcome, ProbeError> {
        let api_key = config
            .api_key
            .as_ref()
            .ok_or_else(|| ProbeError::MissingCredential {
                credential: "api key".to_string(),
            })?;

        let url = format!("{}/chat/completions", config.api_url());
        let request = ChatRequest::primary_probe(&config.model);
        self.chat(&url, api_key.expose(), &request, config.probe_timeout())
            .await
    }

    async fn secondary(
        &self,
        config: &Config,
        endpoint: SecondaryEndpoint,
    ) -> Result<Value, ProbeError> {
        let token = config.bearer_token.expose();
        let timeout = config.probe_timeout();
        match endpoint {
            SecondaryEndpoint::Models => to_payload(&self.list_models(config).await?),
            SecondaryEndpoint::ChatCompletions => {
                let url = format!("{}/chat/completions", config.api_url());
                let request = ChatRequest::secondary_probe(&config.model);
                to_payload(&self.chat(&url, token, &request, timeout).await?)
            }
            SecondaryEndpoint::Health => {
                let url = format!("{}/health", config.service_root());
                let health: HealthStatus = self.get_json(&url, None, timeout).await?;
                to_payload(&health)
            }
            SecondaryEndpoint::Usage => {
                let url = format!("{}/usage", config.service_root());
                let usage: UsageStats = self.get_json(&url, Some(token), timeout).await?;
                to_payload(&usage)
            }
        }
    }

    async fn endpoint_status(
        &self,
        config: &Config,
        endpoint: EndpointSpec,
    ) -> Result<u16, ProbeError> {
        let url = format!("{}{}", config.service_root(), endpoint.path);
        let mut request = match endpoint.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self
                .client
                .post(&url)
                .json(&ChatRequest::secondary_probe(&config.model)),
        };
        if endpoint.needs_auth {
            request = request.bearer_auth(config.bearer_token.expose());
        }

        let response = self.send(request, &url, config.probe_timeout()).await?;
        Ok(response.status().as_u16())
    }
}

fn to_payload<T: serde::Serialize>(value: &T) -> Result<Value, ProbeError> {
    serde_json::to_value(value).map_err(|e| ProbeError::UnexpectedResponse {
        message: e.to_string(),
    })
}

/// Pull a readable message out of an error body.
///
/// Prefers `error.message`, then `message`, then `detail`, then the raw text.
fn extract_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };

    let pointer = ["/error/message", "/message", "/detail", "/error"]
        .iter()
        .find_map(|p| value.pointer(p).and_then(Value::as_str));

    pointer.map_or_else(|| body.trim().to_string(), str::to_string)
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
