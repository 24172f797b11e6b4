//! LLM client abstraction for the beatsheet pipeline.
//!
//! This crate provides:
//! - The `LlmClient` trait consumed by segmentation
//! - Request/response types with trace metadata
//! - A structural JSON-schema validator applied before any response is trusted
//! - An OpenAI-compatible HTTP client with retry/backoff
//! - A deterministic mock client for tests
//!
//! Callers must only depend on the `LlmClient` trait, never on a concrete
//! provider client.

pub mod client;
pub mod error;
pub mod mock;
pub mod openai;
pub mod schema;
pub mod types;

pub use client::LlmClient;
pub use error::{LlmError, LlmResult};
pub use mock::MockLlmClient;
pub use openai::{OpenAiClient, OpenAiConfig};
pub use schema::validate_json_schema;
pub use types::{LlmJsonRequest, LlmMessage, LlmRequest, LlmResponse, LlmUsage, Role};
