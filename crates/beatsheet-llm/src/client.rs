//! Base client trait.

use async_trait::async_trait;

use crate::error::LlmResult;
use crate::types::{LlmJsonRequest, LlmRequest, LlmResponse};

/// Abstract interface every LLM client implements.
///
/// Pipeline code must only use this trait, never a provider client directly.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a free-form text response.
    async fn generate_text(&self, req: &LlmRequest) -> LlmResult<LlmResponse>;

    /// Generate a JSON response validated against the request's schema.
    ///
    /// Implementations must parse the provider output and run it through
    /// schema validation before returning; callers receive either validated
    /// JSON or a typed error (`InvalidSchema`, `JsonParse`, `SchemaViolation`,
    /// or a provider/network failure).
    async fn generate_json(&self, req: &LlmJsonRequest) -> LlmResult<LlmResponse>;
}
