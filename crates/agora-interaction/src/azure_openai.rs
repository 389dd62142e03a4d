//! Azure OpenAI chat-completions client.
//!
//! Direct REST implementation against an Azure OpenAI deployment. The
//! client owns only the wire exchange; the tool-call loop lives in
//! [`crate::chat_agent`]. Nothing is retried here: failures are mapped
//! to descriptive [`AgoraError::Agent`] values for the caller.

use agora_core::{
    AgoraError, ConversationMessage, MessageRole, Result, Tool,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_VERSION: &str = "2024-07-01-preview";

/// Client for one Azure OpenAI chat deployment.
#[derive(Clone)]
pub struct AzureOpenAiClient {
    client: reqwest::Client,
    endpoint: String,
    deployment: String,
    api_key: String,
    api_version: String,
}

impl AzureOpenAiClient {
    pub fn new(
        endpoint: impl Into<String>,
        deployment: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            deployment: deployment.into(),
            api_key: api_key.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        let api_version = api_version.into();
        if !api_version.is_empty() {
            self.api_version = api_version;
        }
        self
    }

    fn url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }

    /// Sends one chat-completion request.
    pub async fn complete(&self, request: &ChatCompletionRequest) -> Result<ChatCompletion> {
        let response = self
            .client
            .post(self.url())
            .header("api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| AgoraError::agent(format!("chat completion request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(AgoraError::agent(map_error_body(status.as_u16(), &body)));
        }

        response
            .json()
            .await
            .map_err(|e| AgoraError::agent(format!("failed to parse chat completion: {e}")))
    }
}

fn map_error_body(status: u16, body: &str) -> String {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.to_string());
    format!("chat completion returned status {status}: {message}")
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatCompletionRequest {
    pub fn new(messages: Vec<WireMessage>) -> Self {
        Self {
            messages,
            tools: None,
            tool_choice: None,
            response_format: None,
            max_tokens: None,
        }
    }
}

/// A chat message as the endpoint sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl WireMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Result of one tool invocation, addressed to its originating call.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    pub fn from_conversation(message: &ConversationMessage) -> Self {
        match message.role {
            MessageRole::User => Self::user(&message.content),
            MessageRole::Assistant => Self::assistant(&message.content),
            MessageRole::System => Self::system(&message.content),
        }
    }
}

/// A tool declaration in the request payload.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionDefinition,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    pub fn from_tool(tool: &dyn Tool) -> Self {
        Self {
            kind: "function".to_string(),
            function: FunctionDefinition {
                name: tool.name(),
                description: tool.description(),
                parameters: tool.parameters(),
            },
        }
    }
}

/// A tool invocation requested by the model. Immutable once issued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded argument object, as sent by the endpoint.
    pub arguments: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ResponseFormat {
    #[serde(rename = "json_object")]
    JsonObject,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletion {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: WireMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct WireUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_without_empty_optionals() {
        let request = ChatCompletionRequest::new(vec![WireMessage::user("hi")]);
        let value = serde_json::to_value(&request).unwrap();

        assert!(value.get("tools").is_none());
        assert!(value.get("response_format").is_none());
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "hi");
    }

    #[test]
    fn tool_definition_uses_function_wire_shape() {
        let tool = agora_core::tool::Calculate;
        let definition = ToolDefinition::from_tool(&tool);
        let value = serde_json::to_value(&definition).unwrap();

        assert_eq!(value["type"], "function");
        assert_eq!(value["function"]["name"], "calculate");
        assert!(value["function"]["parameters"]["properties"]["expression"].is_object());
    }

    #[test]
    fn completion_with_tool_calls_deserializes() {
        let payload = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "get_weather",
                            "arguments": "{\"location\": \"Paris\"}"
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": { "prompt_tokens": 12, "completion_tokens": 7 }
        });

        let completion: ChatCompletion = serde_json::from_value(payload).unwrap();
        let calls = completion.choices[0].message.tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].function.name, "get_weather");
        assert_eq!(completion.usage.unwrap().prompt_tokens, 12);
    }

    #[test]
    fn response_format_serializes_as_json_object() {
        let value = serde_json::to_value(ResponseFormat::JsonObject).unwrap();
        assert_eq!(value, json!({ "type": "json_object" }));
    }

    #[test]
    fn conversation_roles_map_to_wire_roles() {
        let wire = WireMessage::from_conversation(&ConversationMessage::system("be brief"));
        assert_eq!(wire.role, "system");
        assert_eq!(wire.content.as_deref(), Some("be brief"));
    }
}
