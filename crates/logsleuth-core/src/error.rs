use crate::traits::llm::LlmError;

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Fatal at startup only: missing credential or system prompt source.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("Memory error: {0}")]
    Memory(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, AgentError>;
