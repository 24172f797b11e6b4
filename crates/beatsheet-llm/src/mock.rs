//! Deterministic mock client for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::Value;

use crate::client::LlmClient;
use crate::error::{LlmError, LlmResult};
use crate::types::{LlmJsonRequest, LlmRequest, LlmResponse};

/// A call observed by the mock, kept for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub run_id: Option<String>,
    pub step_name: Option<String>,
    pub user_content: String,
    /// Schema the caller supplied, for `generate_json` calls
    pub schema: Option<Value>,
}

/// Mock LLM client backed by a FIFO fixture queue.
///
/// Each `generate_json` call pops the next fixture and returns it verbatim,
/// so tests control exactly what the pipeline sees. Fixtures are not
/// schema-validated; feeding invalid payloads is how repair-path tests are
/// driven.
#[derive(Default)]
pub struct MockLlmClient {
    fixtures: Mutex<VecDeque<Value>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON fixture for the next `generate_json` call.
    pub fn push_json(&self, fixture: Value) {
        self.fixtures.lock().unwrap().push_back(fixture);
    }

    /// Queue a text fixture for the next `generate_text` call.
    pub fn push_text(&self, fixture: impl Into<String>) {
        self.fixtures
            .lock()
            .unwrap()
            .push_back(Value::String(fixture.into()));
    }

    /// All calls observed so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, req: &LlmRequest, schema: Option<&Value>) {
        let user_content = req
            .messages
            .iter()
            .rev()
            .find(|m| matches!(m.role, crate::types::Role::User))
            .map(|m| m.content.clone())
            .unwrap_or_default();

        self.calls.lock().unwrap().push(RecordedCall {
            model: req.model.clone(),
            run_id: req.run_id.clone(),
            step_name: req.step_name.clone(),
            user_content,
            schema: schema.cloned(),
        });
    }

    fn pop_fixture(&self) -> LlmResult<Value> {
        self.fixtures
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| LlmError::provider("MockLlmClient: no fixture queued for this call"))
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    async fn generate_text(&self, req: &LlmRequest) -> LlmResult<LlmResponse> {
        self.record(req, None);
        let fixture = self.pop_fixture()?;
        let text = fixture
            .as_str()
            .ok_or_else(|| LlmError::provider("MockLlmClient: text fixture must be a string"))?
            .to_string();

        Ok(LlmResponse {
            text,
            json: None,
            usage: None,
            model: Some(req.model.clone()),
            request_id: None,
            latency_ms: Some(0),
        })
    }

    async fn generate_json(&self, req: &LlmJsonRequest) -> LlmResult<LlmResponse> {
        self.record(&req.request, Some(&req.schema));
        let fixture = self.pop_fixture()?;

        Ok(LlmResponse {
            text: fixture.to_string(),
            json: Some(fixture),
            usage: None,
            model: Some(req.request.model.clone()),
            request_id: None,
            latency_ms: Some(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LlmMessage;
    use serde_json::json;

    #[tokio::test]
    async fn test_fixtures_pop_in_order() {
        let mock = MockLlmClient::new();
        mock.push_json(json!({"beats": [1]}));
        mock.push_json(json!({"beats": [2]}));

        let req = LlmJsonRequest::new(
            LlmRequest::new("test-model", vec![LlmMessage::user("chunk 1")]),
            json!({"type": "object"}),
        );

        let first = mock.generate_json(&req).await.unwrap();
        let second = mock.generate_json(&req).await.unwrap();
        assert_eq!(first.json.unwrap()["beats"][0], 1);
        assert_eq!(second.json.unwrap()["beats"][0], 2);
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_queue_errors() {
        let mock = MockLlmClient::new();
        let req = LlmJsonRequest::new(
            LlmRequest::new("test-model", vec![LlmMessage::user("chunk")]),
            json!({"type": "object"}),
        );
        let err = mock.generate_json(&req).await.unwrap_err();
        assert!(matches!(err, LlmError::Provider(_)));
    }

    #[tokio::test]
    async fn test_call_log_captures_trace() {
        let mock = MockLlmClient::new();
        mock.push_json(json!({}));
        let req = LlmJsonRequest::new(
            LlmRequest::new("test-model", vec![LlmMessage::user("numbered script")])
                .with_trace("run-9", "BEAT_SEGMENTER"),
            json!({"type": "object"}),
        );
        mock.generate_json(&req).await.unwrap();

        let calls = mock.calls();
        assert_eq!(calls[0].run_id.as_deref(), Some("run-9"));
        assert_eq!(calls[0].user_content, "numbered script");
        assert!(calls[0].schema.is_some());
    }
}
