//! Model provider trait

use async_trait::async_trait;
use thiserror::Error;

use crate::message::ChatMessage;
use crate::traits::tool::ToolInfo;
use crate::types::LlmResponse;

/// The model transport: given an ordered message sequence plus the tool
/// declarations available to it, returns either final text or a list of
/// requested tool calls.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolInfo],
    ) -> Result<LlmResponse, LlmError>;

    fn provider_name(&self) -> &str;
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API error: {message}")]
    Api {
        message: String,
        status: Option<u16>,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::Serialization(err.to_string())
    }
}
