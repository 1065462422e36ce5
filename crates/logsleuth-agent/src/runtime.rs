//! The agent loop.
//!
//! One user utterance is processed fully before the caller gets a response:
//! ask the model, dispatch any requested tool calls, fold the results back
//! into the in-flight message sequence, ask again. The iteration budget is
//! the only bound on work per utterance; exhausting it is a degraded answer,
//! not an error. Session memory changes only at turn boundaries: the user
//! turn and the final assistant turn, nothing from intermediate tool rounds.

use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use logsleuth_core::{AgentError, ChatMessage, LlmProvider, Result};
use logsleuth_memory::SessionStore;
use logsleuth_tools::ToolRegistry;

use crate::dispatch::ToolDispatcher;

pub struct LogAgent {
    llm: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    dispatcher: ToolDispatcher,
    sessions: SessionStore,
    system_prompt: String,
    max_iterations: u32,
}

impl std::fmt::Debug for LogAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogAgent")
            .field("system_prompt", &self.system_prompt)
            .field("max_iterations", &self.max_iterations)
            .finish_non_exhaustive()
    }
}

impl LogAgent {
    pub fn builder() -> LogAgentBuilder {
        LogAgentBuilder::new()
    }

    /// Answer one user utterance within the given session. Failures render as
    /// text here; nothing escapes this boundary.
    pub async fn process(&self, input: &str, session_id: &str) -> String {
        match self.run_loop(input, session_id).await {
            Ok(text) => text,
            Err(e) => {
                error!(session = %session_id, error = %e, "Query failed");
                format!("Error processing query: {}", e)
            }
        }
    }

    #[instrument(skip(self, input, session_id), fields(session = %session_id))]
    async fn run_loop(&self, input: &str, session_id: &str) -> Result<String> {
        if input.trim().is_empty() {
            return Err(AgentError::Other("input cannot be empty".into()));
        }

        info!(input_len = input.len(), "Processing query");

        let memory = self.sessions.get_or_create(session_id);
        let declarations = self.tools.list_infos();

        let mut messages = vec![ChatMessage::system(self.system_prompt.as_str())];
        messages.extend(memory.get_messages(None).await?);
        messages.push(ChatMessage::user(input));

        let mut response = self.llm.complete(&messages, &declarations).await?;
        let mut rounds = 0u32;

        while response.has_tool_calls() {
            if rounds >= self.max_iterations {
                warn!(
                    rounds = rounds,
                    "Iteration budget exhausted, returning last response"
                );
                break;
            }
            rounds += 1;

            debug!(
                round = rounds,
                max = self.max_iterations,
                calls = response.tool_calls.len(),
                "Dispatching tool calls"
            );

            let outcomes = self.dispatcher.dispatch(&response.tool_calls).await;

            // The assistant turn keeps its raw tool-call metadata so the
            // model can correlate each result by call id.
            messages.push(ChatMessage::assistant_with_calls(
                response.content.clone(),
                response.tool_calls.clone(),
            ));
            for outcome in outcomes {
                messages.push(outcome.into_message());
            }

            response = self.llm.complete(&messages, &declarations).await?;
        }

        let text = response.content.extract_text();

        memory.add_message(ChatMessage::user(input)).await?;
        memory.add_message(ChatMessage::assistant(text.as_str())).await?;

        info!(rounds = rounds, response_len = text.len(), "Query completed");
        Ok(text)
    }

    /// Empty a session's conversation history.
    pub async fn clear_session(&self, session_id: &str) -> Result<()> {
        self.sessions.clear(session_id).await?;
        info!(session = %session_id, "Session history cleared");
        Ok(())
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }
}

pub struct LogAgentBuilder {
    llm: Option<Arc<dyn LlmProvider>>,
    tools: Option<Arc<ToolRegistry>>,
    sessions: Option<SessionStore>,
    system_prompt: String,
    max_iterations: u32,
}

impl LogAgentBuilder {
    pub fn new() -> Self {
        Self {
            llm: None,
            tools: None,
            sessions: None,
            system_prompt: crate::config::DEFAULT_SYSTEM_PROMPT.to_string(),
            max_iterations: 5,
        }
    }

    pub fn llm(mut self, llm: Arc<dyn LlmProvider>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn tools(mut self, tools: Arc<ToolRegistry>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn sessions(mut self, sessions: SessionStore) -> Self {
        self.sessions = Some(sessions);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn build(self) -> Result<LogAgent> {
        let llm = self
            .llm
            .ok_or_else(|| AgentError::Config("LLM provider is required".into()))?;
        let tools = self
            .tools
            .ok_or_else(|| AgentError::Config("tool registry is required".into()))?;

        Ok(LogAgent {
            llm,
            dispatcher: ToolDispatcher::new(Arc::clone(&tools)),
            tools,
            sessions: self.sessions.unwrap_or_default(),
            system_prompt: self.system_prompt,
            max_iterations: self.max_iterations,
        })
    }
}

impl Default for LogAgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
