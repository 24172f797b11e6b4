//! OpenAI-compatible chat-completions client.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::client::LlmClient;
use crate::error::{LlmError, LlmResult};
use crate::schema::validate_json_schema;
use crate::types::{LlmJsonRequest, LlmRequest, LlmResponse, LlmUsage};

/// Configuration for the OpenAI client.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    /// Base URL of the chat-completions API
    pub base_url: String,
    /// Fallback timeout when a request does not carry one
    pub timeout: Duration,
    /// Max retry attempts for rate limits and transient network failures
    pub max_retries: u32,
}

impl OpenAiConfig {
    /// Create config from environment variables (`OPENAI_API_KEY`,
    /// `OPENAI_BASE_URL`).
    pub fn from_env() -> LlmResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| LlmError::provider("OPENAI_API_KEY not set"))?;

        Ok(Self {
            api_key,
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            timeout: Duration::from_secs(60),
            max_retries: 3,
        })
    }
}

/// OpenAI implementation of `LlmClient`.
///
/// Handles retries, rate limiting, and error translation.
pub struct OpenAiClient {
    http: Client,
    config: OpenAiConfig,
}

/// Chat-completions request.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

/// Chat-completions response.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    id: Option<String>,
    model: Option<String>,
    choices: Vec<Choice>,
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

impl OpenAiClient {
    /// Create a new OpenAI client.
    pub fn new(config: OpenAiConfig) -> LlmResult<Self> {
        let http = Client::builder().build().map_err(LlmError::Network)?;
        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> LlmResult<Self> {
        Self::new(OpenAiConfig::from_env()?)
    }

    async fn call_api(
        &self,
        req: &LlmRequest,
        response_format: Option<ResponseFormat>,
    ) -> LlmResult<(ChatResponse, u64)> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let body = ChatRequest {
            model: &req.model,
            messages: req
                .messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: req.temperature,
            max_tokens: req.max_tokens,
            response_format,
        };

        let timeout = if req.timeout.is_zero() {
            self.config.timeout
        } else {
            req.timeout
        };

        let started = Instant::now();
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .timeout(timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(e.to_string())
                } else {
                    LlmError::Network(e)
                }
            })?;
        let latency_ms = started.elapsed().as_millis() as u64;

        let status = response.status();
        if status.as_u16() == 429 {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::RateLimited(body));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::provider(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::provider(format!("Failed to parse API response: {}", e)))?;

        info!(
            run_id = req.run_id.as_deref().unwrap_or("-"),
            step = req.step_name.as_deref().unwrap_or("-"),
            model = %req.model,
            latency_ms = latency_ms,
            tokens = parsed.usage.as_ref().map(|u| u.total_tokens).unwrap_or(0),
            "LLM request complete"
        );

        Ok((parsed, latency_ms))
    }

    /// Call with exponential backoff on retryable failures.
    async fn call_with_retry(
        &self,
        req: &LlmRequest,
        json_mode: bool,
    ) -> LlmResult<(ChatResponse, u64)> {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            let format = json_mode.then(|| ResponseFormat {
                format_type: "json_object",
            });
            match self.call_api(req, format).await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    warn!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "LLM request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| LlmError::provider("Retries exhausted")))
    }

    fn build_response(parsed: ChatResponse, latency_ms: u64) -> LlmResult<LlmResponse> {
        let text = parsed
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| LlmError::provider("No content in API response"))?;

        Ok(LlmResponse {
            text,
            json: None,
            usage: parsed.usage.map(|u| LlmUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            model: parsed.model,
            request_id: parsed.id,
            latency_ms: Some(latency_ms),
        })
    }
}

/// Strip markdown code fences some providers wrap JSON output in.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text.strip_prefix("```json").unwrap_or(text);
    let text = text.strip_prefix("```").unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

#[async_trait::async_trait]
impl LlmClient for OpenAiClient {
    async fn generate_text(&self, req: &LlmRequest) -> LlmResult<LlmResponse> {
        let (parsed, latency_ms) = self.call_with_retry(req, false).await?;
        Self::build_response(parsed, latency_ms)
    }

    async fn generate_json(&self, req: &LlmJsonRequest) -> LlmResult<LlmResponse> {
        if !req.schema.is_object() {
            return Err(LlmError::InvalidSchema(
                "json schema must be an object".to_string(),
            ));
        }

        let (parsed, latency_ms) = self.call_with_retry(&req.request, true).await?;
        let mut response = Self::build_response(parsed, latency_ms)?;

        let raw = strip_code_fences(&response.text);
        let json: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| LlmError::JsonParse(e.to_string()))?;

        validate_json_schema(&json, &req.schema)?;

        response.json = Some(json);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
    }

    #[test]
    fn test_config_from_env_requires_key() {
        std::env::remove_var("OPENAI_API_KEY");
        assert!(OpenAiConfig::from_env().is_err());
    }
}
