//! Agent loop, tool-call dispatch and configuration for logsleuth

mod config;
mod dispatch;
mod runtime;

pub use config::{AgentConfig, DEFAULT_SYSTEM_PROMPT, SystemPromptSource};
pub use dispatch::{ToolCallOutcome, ToolDispatcher};
pub use runtime::{LogAgent, LogAgentBuilder};
