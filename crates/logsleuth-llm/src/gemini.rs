//! Gemini `generateContent` transport.
//!
//! Maps the agent's message sequence onto Gemini contents: system messages
//! become the system instruction, assistant tool requests become
//! `functionCall` parts, and tool results go back as `functionResponse`
//! parts. Gemini does not assign call ids, so one is synthesized per parsed
//! call; correlation inside the loop stays id-based either way.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, instrument};

use logsleuth_core::{
    ChatMessage, ContentBlock, FinishReason, LlmError, LlmProvider, LlmResponse, MessageContent,
    Role, ToolCall, ToolInfo,
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiProvider {
    http: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f32,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            temperature,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ToolDeclarations>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<FunctionCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_response: Option<FunctionResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct FunctionResponse {
    name: String,
    response: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolDeclarations {
    function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Serialize)]
struct FunctionDeclaration {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Content,
    finish_reason: Option<String>,
}

/// Gemini rejects schema metadata keywords that schemars emits.
fn sanitize_schema(mut schema: Value) -> Value {
    if let Some(obj) = schema.as_object_mut() {
        obj.remove("$schema");
        obj.remove("title");
    }
    schema
}

fn text_part(text: String) -> Part {
    Part {
        text: Some(text),
        ..Part::default()
    }
}

fn build_request(
    messages: &[ChatMessage],
    tools: &[ToolInfo],
    temperature: f32,
) -> GenerateRequest {
    let mut system_texts: Vec<String> = Vec::new();
    let mut contents: Vec<Content> = Vec::new();

    for message in messages {
        match message.role {
            Role::System => system_texts.push(message.text()),
            Role::User => contents.push(Content {
                role: Some("user".to_string()),
                parts: vec![text_part(message.text())],
            }),
            Role::Assistant => {
                let mut parts = Vec::new();
                let text = message.text();
                if !text.is_empty() {
                    parts.push(text_part(text));
                }
                for call in &message.tool_calls {
                    parts.push(Part {
                        function_call: Some(FunctionCall {
                            name: call.name.clone(),
                            args: call.arguments.clone(),
                        }),
                        ..Part::default()
                    });
                }
                if parts.is_empty() {
                    parts.push(text_part(String::new()));
                }
                contents.push(Content {
                    role: Some("model".to_string()),
                    parts,
                });
            }
            Role::Tool => {
                let name = message.name.clone().unwrap_or_default();
                contents.push(Content {
                    role: Some("user".to_string()),
                    parts: vec![Part {
                        function_response: Some(FunctionResponse {
                            name,
                            response: json!({ "result": message.text() }),
                        }),
                        ..Part::default()
                    }],
                });
            }
        }
    }

    let system_instruction = if system_texts.is_empty() {
        None
    } else {
        Some(Content {
            role: None,
            parts: vec![text_part(system_texts.join("\n\n"))],
        })
    };

    let tools = if tools.is_empty() {
        None
    } else {
        Some(vec![ToolDeclarations {
            function_declarations: tools
                .iter()
                .map(|info| FunctionDeclaration {
                    name: info.id.clone(),
                    description: info.description.clone(),
                    parameters: sanitize_schema(info.input_schema.clone()),
                })
                .collect(),
        }])
    };

    GenerateRequest {
        system_instruction,
        contents,
        tools,
        generation_config: GenerationConfig { temperature },
    }
}

fn parse_response(response: GenerateResponse, model: &str) -> Result<LlmResponse, LlmError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::Api {
            message: "response carried no candidates".to_string(),
            status: None,
        })?;

    let mut blocks: Vec<ContentBlock> = Vec::new();
    let mut tool_calls: Vec<ToolCall> = Vec::new();

    for part in candidate.content.parts {
        if let Some(text) = part.text {
            blocks.push(ContentBlock::Text { text });
        }
        if let Some(call) = part.function_call {
            tool_calls.push(ToolCall {
                id: uuid::Uuid::new_v4().to_string(),
                name: call.name,
                arguments: call.args,
            });
        }
    }

    let content = match blocks.len() {
        0 => MessageContent::Text(String::new()),
        1 => MessageContent::Text(blocks.remove(0).text().unwrap_or_default().to_string()),
        _ => MessageContent::Blocks(blocks),
    };

    let finish_reason = if !tool_calls.is_empty() {
        FinishReason::ToolCall
    } else {
        match candidate.finish_reason.as_deref() {
            Some("STOP") | None => FinishReason::Stop,
            Some("MAX_TOKENS") => FinishReason::Length,
            Some("SAFETY") => FinishReason::ContentFilter,
            Some(_) => FinishReason::Other,
        }
    };

    Ok(LlmResponse {
        content,
        tool_calls,
        finish_reason,
        model: Some(model.to_string()),
    })
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    #[instrument(skip_all, fields(model = %self.model, messages = messages.len()))]
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolInfo],
    ) -> Result<LlmResponse, LlmError> {
        let request = build_request(messages, tools, self.temperature);
        let url = self.endpoint();

        debug!(tools = tools.len(), "Sending generateContent request");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                message: body,
                status: Some(status.as_u16()),
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Serialization(e.to_string()))?;

        parse_response(parsed, &self.model)
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declarations() -> Vec<ToolInfo> {
        vec![ToolInfo {
            id: "list_log_files".to_string(),
            name: "List Log Files".to_string(),
            description: "List log files".to_string(),
            input_schema: json!({
                "$schema": "https://json-schema.org/draft/2020-12/schema",
                "title": "ListLogsInput",
                "type": "object",
                "properties": {}
            }),
        }]
    }

    #[test]
    fn test_build_request_roles_and_system() {
        let messages = vec![
            ChatMessage::system("You are a DevOps expert."),
            ChatMessage::user("list files"),
            ChatMessage::assistant("done"),
        ];

        let request = build_request(&messages, &[], 0.5);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value["systemInstruction"]["parts"][0]["text"],
            "You are a DevOps expert."
        );
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][1]["role"], "model");
        assert_eq!(value["generationConfig"]["temperature"], 0.5);
        assert!(value.get("tools").is_none());
    }

    #[test]
    fn test_build_request_tool_round_trip_parts() {
        let call = ToolCall {
            id: "c1".into(),
            name: "read_log_file".into(),
            arguments: json!({"filename": "app.log"}),
        };
        let messages = vec![
            ChatMessage::user("read app.log"),
            ChatMessage::assistant_with_calls("", vec![call]),
            ChatMessage::tool_result("c1", "read_log_file", "INFO ok"),
        ];

        let request = build_request(&messages, &declarations(), 0.1);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value["contents"][1]["parts"][0]["functionCall"]["name"],
            "read_log_file"
        );
        assert_eq!(
            value["contents"][2]["parts"][0]["functionResponse"]["response"]["result"],
            "INFO ok"
        );

        let decl = &value["tools"][0]["functionDeclarations"][0];
        assert_eq!(decl["name"], "list_log_files");
        assert!(decl["parameters"].get("$schema").is_none());
        assert!(decl["parameters"].get("title").is_none());
    }

    #[test]
    fn test_with_base_url_overrides_endpoint() {
        let provider = GeminiProvider::new("key", "gemini-2.5-flash", 0.1)
            .with_base_url("http://localhost:8080/v1beta");
        assert_eq!(
            provider.endpoint(),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_parse_text_response() {
        let raw: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "two files"}]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();

        let response = parse_response(raw, "gemini-2.5-flash").unwrap();
        assert_eq!(response.content.extract_text(), "two files");
        assert!(!response.has_tool_calls());
        assert_eq!(response.finish_reason, FinishReason::Stop);
    }

    #[test]
    fn test_parse_function_call_response() {
        let raw: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"functionCall": {"name": "search_logs",
                                      "args": {"filename": "app.log", "search_term": "ERROR"}}}
                ]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();

        let response = parse_response(raw, "gemini-2.5-flash").unwrap();
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].name, "search_logs");
        assert!(!response.tool_calls[0].id.is_empty());
        assert_eq!(response.finish_reason, FinishReason::ToolCall);
    }

    #[test]
    fn test_parse_empty_candidates_is_api_error() {
        let raw: GenerateResponse = serde_json::from_value(json!({"candidates": []})).unwrap();
        assert!(matches!(
            parse_response(raw, "m"),
            Err(LlmError::Api { .. })
        ));
    }

    #[test]
    fn test_parse_multiple_text_parts_concatenate() {
        let raw: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [{"text": "a"}, {"text": "b"}]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();

        let response = parse_response(raw, "m").unwrap();
        assert_eq!(response.content.extract_text(), "ab");
    }
}
