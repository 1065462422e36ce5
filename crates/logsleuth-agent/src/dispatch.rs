//! Tool-call dispatch.
//!
//! Every request produces exactly one outcome, in input order. Failures are
//! conversational: resolution and execution errors become failure-shaped
//! results that flow back to the model as tool-result text, never errors to
//! the loop's caller.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use logsleuth_core::{ChatMessage, ToolCall, ToolResult};
use logsleuth_tools::{ToolError, ToolRegistry};

#[derive(Debug, Clone)]
pub struct ToolCallOutcome {
    pub call_id: String,
    pub tool_name: String,
    pub result: ToolResult,
}

impl ToolCallOutcome {
    /// Render as the tool-result turn answering this call.
    pub fn into_message(self) -> ChatMessage {
        let content = if self.result.success {
            self.result.output
        } else {
            format!("Error: {}", self.result.output)
        };
        ChatMessage::tool_result(self.call_id, self.tool_name, content)
    }
}

pub struct ToolDispatcher {
    tools: Arc<ToolRegistry>,
}

impl ToolDispatcher {
    pub fn new(tools: Arc<ToolRegistry>) -> Self {
        Self { tools }
    }

    #[instrument(skip_all, fields(requests = calls.len()))]
    pub async fn dispatch(&self, calls: &[ToolCall]) -> Vec<ToolCallOutcome> {
        let mut outcomes = Vec::with_capacity(calls.len());

        for call in calls {
            let result = match self.tools.get(&call.name) {
                Some(tool) => {
                    info!(tool = %call.name, args = %call.arguments, "Executing tool");
                    tool.execute(call.arguments.clone()).await
                }
                None => {
                    warn!(tool = %call.name, "Tool not found");
                    ToolError::NotFound(call.name.clone()).into()
                }
            };

            if result.success {
                info!(tool = %call.name, output_len = result.output.len(), "Tool succeeded");
            } else {
                error!(tool = %call.name, error = %result.output, "Tool failed");
            }

            outcomes.push(ToolCallOutcome {
                call_id: call.id.clone(),
                tool_name: call.name.clone(),
                result,
            });
        }

        outcomes
    }
}
