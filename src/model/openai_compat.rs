//! Chat Completions client for OpenAI-compatible APIs.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::http::{bearer_headers, shared_client, status_to_error};
use super::ChatModel;
use crate::capability::CapabilityDefinition;
use crate::config::EngineConfig;
use crate::error::TrellisError;
use crate::types::{Message, Role, ToolCall};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for any API speaking the Chat Completions protocol.
pub struct OpenAiCompatModel {
    model_id: String,
    api_key: String,
    base_url: String,
}

impl OpenAiCompatModel {
    pub fn new(model_id: impl Into<String>, api_key: impl Into<String>, base_url: Option<String>) -> Self {
        Self {
            model_id: model_id.into(),
            api_key: api_key.into(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    /// Build a client from engine configuration.
    pub fn from_config(config: &EngineConfig) -> Result<Self, TrellisError> {
        let api_key = config
            .api_key()
            .ok_or_else(|| TrellisError::Configuration("no API key configured".into()))?;
        Ok(Self::new(
            config.model().to_string(),
            api_key,
            config.base_url().map(|u| u.to_string()),
        ))
    }

    fn build_request_body(
        &self,
        system_prompt: &str,
        messages: &[Message],
        capabilities: &[CapabilityDefinition],
    ) -> serde_json::Value {
        let mut wire_messages = Vec::with_capacity(messages.len() + 1);
        if !system_prompt.is_empty() {
            wire_messages.push(serde_json::json!({
                "role": "system",
                "content": system_prompt,
            }));
        }
        for message in messages {
            wire_messages.push(message_to_wire(message));
        }

        let mut body = serde_json::json!({
            "model": self.model_id,
            "messages": wire_messages,
        });

        if !capabilities.is_empty() {
            let tools: Vec<serde_json::Value> = capabilities
                .iter()
                .map(|c| {
                    serde_json::json!({
                        "type": "function",
                        "function": {
                            "name": c.name,
                            "description": c.description,
                            "parameters": c.parameters,
                        }
                    })
                })
                .collect();
            body.as_object_mut()
                .expect("body is an object")
                .insert("tools".into(), tools.into());
        }

        body
    }
}

#[async_trait]
impl ChatModel for OpenAiCompatModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn invoke(
        &self,
        system_prompt: &str,
        messages: &[Message],
        capabilities: &[CapabilityDefinition],
    ) -> Result<Message, TrellisError> {
        let body = self.build_request_body(system_prompt, messages, capabilities);
        let url = format!("{}/chat/completions", self.base_url);

        debug!(model = %self.model_id, tools = capabilities.len(), "chat completion request");

        let resp = shared_client()
            .post(&url)
            .headers(bearer_headers(&self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let data: ChatResponse = resp.json().await?;
        let choice = data
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| TrellisError::ModelInvocation("no choices in response".into()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolCall {
                id: tc.id,
                name: tc.function.name,
                // Arguments arrive as a JSON string; fall back to the raw text
                // when it does not parse.
                arguments: serde_json::from_str(&tc.function.arguments)
                    .unwrap_or(serde_json::Value::String(tc.function.arguments)),
            })
            .collect();

        Ok(Message::assistant_with_calls(
            choice.message.content.unwrap_or_default(),
            tool_calls,
        ))
    }
}

fn message_to_wire(message: &Message) -> serde_json::Value {
    match message.role {
        Role::Tool => serde_json::json!({
            "role": "tool",
            "content": message.content,
            "tool_call_id": message.tool_call_id,
        }),
        Role::Assistant if message.has_tool_calls() => {
            let calls: Vec<serde_json::Value> = message
                .tool_calls
                .iter()
                .map(|tc| {
                    serde_json::json!({
                        "id": tc.id,
                        "type": "function",
                        "function": {
                            "name": tc.name,
                            "arguments": tc.arguments.to_string(),
                        }
                    })
                })
                .collect();
            serde_json::json!({
                "role": "assistant",
                "content": message.content,
                "tool_calls": calls,
            })
        }
        role => serde_json::json!({
            "role": role.to_string(),
            "content": message.content,
        }),
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Deserialize)]
struct WireToolCall {
    id: String,
    function: WireFunction,
}

#[derive(Debug, Deserialize)]
struct WireFunction {
    name: String,
    arguments: String,
}
