//! Tool system for the logsleuth agent

pub mod builtin;
mod registry;

pub use builtin::{ListLogFilesTool, ReadLogFileTool, RestartPodTool, SearchLogsTool};
pub use logsleuth_core::{Tool, ToolInfo, ToolResult};
pub use registry::ToolRegistry;

use schemars::JsonSchema;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),
    #[error("Tool already registered: {0}")]
    Duplicate(String),
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),
}

/// Tool errors are conversational: they become failure-shaped results that
/// flow back to the model as text rather than aborting the loop.
impl From<ToolError> for ToolResult {
    fn from(error: ToolError) -> Self {
        ToolResult::error(error.to_string())
    }
}

pub fn generate_schema<T: JsonSchema>() -> serde_json::Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(schema).unwrap_or_else(|_| serde_json::json!({}))
}

/// Registry with the log-analysis tools only (no cluster actions).
pub fn log_tools(log_dir: impl AsRef<Path>) -> ToolRegistry {
    let log_dir = log_dir.as_ref();
    let mut registry = ToolRegistry::new();
    registry
        .register(Arc::new(ReadLogFileTool::new(log_dir)))
        .expect("failed to register read_log_file");
    registry
        .register(Arc::new(ListLogFilesTool::new(log_dir)))
        .expect("failed to register list_log_files");
    registry
        .register(Arc::new(SearchLogsTool::new(log_dir)))
        .expect("failed to register search_logs");
    registry
}

/// Registry with log-analysis tools plus the Kubernetes restart action.
pub fn ops_tools(log_dir: impl AsRef<Path>, default_namespace: impl Into<String>) -> ToolRegistry {
    let mut registry = log_tools(log_dir);
    registry
        .register(Arc::new(RestartPodTool::new(default_namespace)))
        .expect("failed to register restart_kubernetes_pod");
    registry
}
