//! LLM client error types.

use thiserror::Error;

pub type LlmResult<T> = Result<T, LlmError>;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Invalid or missing JSON schema: {0}")]
    InvalidSchema(String),

    #[error("Failed to parse JSON response: {0}")]
    JsonParse(String),

    #[error("Response violates schema: {0}")]
    SchemaViolation(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::Timeout(_) | LlmError::RateLimited(_) | LlmError::Network(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(LlmError::Timeout("t".into()).is_retryable());
        assert!(LlmError::RateLimited("r".into()).is_retryable());
        assert!(!LlmError::SchemaViolation("s".into()).is_retryable());
        assert!(!LlmError::JsonParse("p".into()).is_retryable());
    }
}
