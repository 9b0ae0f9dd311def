//! Wire types for the probed service.
//!
//! Request bodies follow the OpenAI-compatible chat-completions shape the
//! service speaks. Response types are deliberately lenient: every field is
//! optional so that a partially filled payload still decodes and the probe
//! can decide whether it is usable.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Prompt sent by the primary authentication probe.
pub const PRIMARY_PROBE_PROMPT: &str =
    "Hello! This is a test message. Please respond with \"Connection successful!\"";

/// Prompt sent by the secondary chat probe.
pub const SECONDARY_PROBE_PROMPT: &str = "Test message";

/// A chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role (`user`, `assistant`, `system`).
    pub role: String,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat-completions request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    /// Model identifier.
    pub model: String,
    /// Conversation messages.
    pub messages: Vec<ChatMessage>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

impl ChatRequest {
    /// Minimal round trip used by the primary authentication probe.
    #[must_use]
    pub fn primary_probe(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::user(PRIMARY_PROBE_PROMPT)],
            max_tokens: 50,
            temperature: 0.1,
        }
    }

    /// Inference attempt used by the secondary chat probe.
    #[must_use]
    pub fn secondary_probe(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::user(SECONDARY_PROBE_PROMPT)],
            max_tokens: 500,
            temperature: 0.7,
        }
    }
}

/// Chat-completions response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    /// Generated choices.
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    /// Model that served the request.
    #[serde(default)]
    pub model: Option<String>,
    /// Token accounting.
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

impl ChatResponse {
    /// Text of the first choice, if the response carries one.
    #[must_use]
    pub fn first_reply(&self) -> Option<String> {
        self.choices
            .first()
            .map(|choice| choice.message.content.clone().unwrap_or_default())
    }
}

/// One generated choice.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatChoice {
    /// Generated message.
    #[serde(default)]
    pub message: ChoiceMessage,
}

/// Message inside a choice.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChoiceMessage {
    /// Generated text.
    #[serde(default)]
    pub content: Option<String>,
}

/// Token usage counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt tokens.
    #[serde(default)]
    pub prompt_tokens: Option<u64>,
    /// Completion tokens.
    #[serde(default)]
    pub completion_tokens: Option<u64>,
    /// Total tokens.
    #[serde(default)]
    pub total_tokens: Option<u64>,
}

/// Successful outcome of a chat round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatOutcome {
    /// Reply text of the first choice.
    pub response: String,
    /// Model reported by the service, or the requested model.
    pub model: String,
    /// Token usage, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

/// One entry of the models listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

impl ModelInfo {
    /// Identifier, falling back to the display name.
    #[must_use]
    pub fn label(&self) -> &str {
        self.id
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("unknown")
    }
}

/// Extract the model list from a listing payload.
///
/// Accepts a bare JSON array or an object wrapping the array in `data`.
#[must_use]
pub fn parse_model_list(body: &Value) -> Option<Vec<ModelInfo>> {
    let entries = match body {
        Value::Array(items) => items,
        Value::Object(map) => map.get("data")?.as_array()?,
        _ => return None,
    };
    Some(
        entries
            .iter()
            .map(|entry| serde_json::from_value(entry.clone()).unwrap_or_default())
            .collect(),
    )
}

/// Successful outcome of the models listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelsOutcome {
    /// Number of models returned.
    pub count: usize,
    /// Model labels in listing order.
    pub models: Vec<String>,
}

/// Health endpoint payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Reported status string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Reported uptime; the service sends either a number or a string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<Value>,
}

/// Usage endpoint payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    /// Total queries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queries: Option<u64>,
    /// Total tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
    /// Prompt tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens: Option<u64>,
    /// Completion tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u64>,
}

/// Endpoints reachable with the secondary credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryEndpoint {
    /// `GET {base}/models`
    Models,
    /// `POST {base}/chat/completions`
    ChatCompletions,
    /// `GET {root}/health`
    Health,
    /// `GET {root}/usage`
    Usage,
}

/// HTTP method of an endpoint-availability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// One path checked by the endpoint-availability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointSpec {
    /// Path appended to the service root.
    pub path: &'static str,
    /// HTTP method.
    pub method: HttpMethod,
    /// Whether the secondary credential is sent.
    pub needs_auth: bool,
}

/// Paths checked by the endpoint-availability probe, in check order.
pub const AVAILABILITY_ENDPOINTS: [EndpointSpec; 3] = [
    EndpointSpec {
        path: "/models",
        method: HttpMethod::Get,
        needs_auth: true,
    },
    EndpointSpec {
        path: "/health",
        method: HttpMethod::Get,
        needs_auth: false,
    },
    EndpointSpec {
        path: "/chat/completions",
        method: HttpMethod::Post,
        needs_auth: true,
    },
];
