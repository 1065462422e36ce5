//! LLM providers for the logsleuth agent

mod gemini;
mod mock;

pub use gemini::GeminiProvider;
pub use logsleuth_core::{LlmError, LlmProvider};
pub use mock::MockLlmProvider;
