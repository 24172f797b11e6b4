//! Request and response types for LLM generation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Message role in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmMessage {
    pub role: Role,
    pub content: String,
}

impl LlmMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Base request for LLM generation.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub messages: Vec<LlmMessage>,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout: Duration,

    /// Trace metadata, never sent to the provider
    pub run_id: Option<String>,
    pub step_name: Option<String>,
}

impl LlmRequest {
    pub fn new(model: impl Into<String>, messages: Vec<LlmMessage>) -> Self {
        Self {
            messages,
            model: model.into(),
            temperature: 0.2,
            max_tokens: 1200,
            timeout: Duration::from_secs(60),
            run_id: None,
            step_name: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_trace(
        mut self,
        run_id: impl Into<String>,
        step_name: impl Into<String>,
    ) -> Self {
        self.run_id = Some(run_id.into());
        self.step_name = Some(step_name.into());
        self
    }
}

/// Request for JSON-structured generation validated against a schema.
#[derive(Debug, Clone)]
pub struct LlmJsonRequest {
    pub request: LlmRequest,
    /// JSON schema the parsed response must satisfy
    pub schema: serde_json::Value,
}

impl LlmJsonRequest {
    pub fn new(request: LlmRequest, schema: serde_json::Value) -> Self {
        Self { request, schema }
    }
}

/// Token usage statistics.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LlmUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Standard LLM response.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: String,
    /// Parsed JSON for `generate_json`
    pub json: Option<serde_json::Value>,
    pub usage: Option<LlmUsage>,
    pub model: Option<String>,
    pub request_id: Option<String>,
    pub latency_ms: Option<u64>,
}
