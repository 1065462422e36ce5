//! Core types and traits for the logsleuth agent

pub mod content;
pub mod error;
pub mod message;
pub mod traits;
pub mod types;

pub use content::{ContentBlock, MessageContent};
pub use error::{AgentError, Result};
pub use message::{ChatMessage, Role};
pub use traits::llm::{LlmError, LlmProvider};
pub use traits::memory::Memory;
pub use traits::tool::{Tool, ToolInfo, ToolResult};
pub use types::{FinishReason, LlmResponse, ToolCall};
