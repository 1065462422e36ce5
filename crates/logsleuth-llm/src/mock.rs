//! Scriptable provider for tests.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use logsleuth_core::{ChatMessage, LlmError, LlmProvider, LlmResponse, ToolInfo};

/// Mock LLM provider. Plays back scripted responses in order, repeating the
/// last one once the script runs out, and records every call it receives.
#[derive(Clone)]
pub struct MockLlmProvider {
    inner: Arc<RwLock<MockInner>>,
}

struct MockInner {
    responses: Vec<LlmResponse>,
    response_index: usize,
    call_history: Vec<MockCall>,
    error_message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MockCall {
    pub messages: Vec<ChatMessage>,
    pub tool_count: usize,
}

impl MockLlmProvider {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MockInner {
                responses: Vec::new(),
                response_index: 0,
                call_history: Vec::new(),
                error_message: None,
            })),
        }
    }

    pub fn with_responses(responses: Vec<LlmResponse>) -> Self {
        let provider = Self::new();
        provider.inner.write().responses = responses;
        provider
    }

    pub fn push_response(&self, response: LlmResponse) {
        self.inner.write().responses.push(response);
    }

    /// Make every subsequent call fail with the given message.
    pub fn set_error(&self, message: impl Into<String>) {
        self.inner.write().error_message = Some(message.into());
    }

    pub fn call_count(&self) -> usize {
        self.inner.read().call_history.len()
    }

    pub fn call_history(&self) -> Vec<MockCall> {
        self.inner.read().call_history.clone()
    }

    pub fn last_call(&self) -> Option<MockCall> {
        self.inner.read().call_history.last().cloned()
    }
}

impl Default for MockLlmProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolInfo],
    ) -> Result<LlmResponse, LlmError> {
        let mut inner = self.inner.write();

        inner.call_history.push(MockCall {
            messages: messages.to_vec(),
            tool_count: tools.len(),
        });

        if let Some(ref message) = inner.error_message {
            return Err(LlmError::Other(message.clone()));
        }

        if inner.responses.is_empty() {
            return Ok(LlmResponse::text("Mock response"));
        }

        let response = inner.responses[inner.response_index].clone();
        if inner.response_index < inner.responses.len() - 1 {
            inner.response_index += 1;
        }
        Ok(response)
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_plays_back_in_order_then_repeats_last() {
        let mock = MockLlmProvider::with_responses(vec![LlmResponse::text("first")]);
        mock.push_response(LlmResponse::text("second"));

        let r1 = mock.complete(&[], &[]).await.unwrap();
        let r2 = mock.complete(&[], &[]).await.unwrap();
        let r3 = mock.complete(&[], &[]).await.unwrap();

        assert_eq!(r1.content.extract_text(), "first");
        assert_eq!(r2.content.extract_text(), "second");
        assert_eq!(r3.content.extract_text(), "second");
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn test_records_calls() {
        let mock = MockLlmProvider::new();
        mock.complete(&[ChatMessage::user("hi")], &[]).await.unwrap();

        let call = mock.last_call().unwrap();
        assert_eq!(call.messages.len(), 1);
        assert_eq!(call.tool_count, 0);
    }

    #[tokio::test]
    async fn test_error_injection() {
        let mock = MockLlmProvider::new();
        mock.set_error("transport down");

        let err = mock.complete(&[], &[]).await.unwrap_err();
        assert!(matches!(err, LlmError::Other(msg) if msg == "transport down"));
    }
}
