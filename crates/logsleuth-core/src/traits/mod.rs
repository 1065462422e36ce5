//! Core traits for the logsleuth agent

pub mod llm;
pub mod memory;
pub mod tool;

pub use llm::LlmProvider;
pub use memory::Memory;
pub use tool::Tool;
