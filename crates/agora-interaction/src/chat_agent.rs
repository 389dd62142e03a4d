//! The chat agent: instructions + tools + the tool-call loop.

use crate::agent::{Agent, AgentReply, ApprovalHandler, TokenUsage};
use crate::azure_openai::{
    AzureOpenAiClient, ChatCompletionRequest, ResponseFormat, ToolCall, ToolDefinition,
    WireMessage,
};
use agora_core::{AgoraError, ConversationHistory, Result, ToolOutput, ToolRegistry};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

const DEFAULT_MAX_TOOL_ROUNDS: usize = 8;

/// An agent backed by one chat deployment.
///
/// Owns the send-messages/receive-tool-calls loop: while the model keeps
/// requesting tool invocations the agent resolves them against its
/// registry, feeding results back, until a plain text reply arrives.
/// Tools declared as requiring approval are routed through the approval
/// handler first; pending approvals are drained one at a time, in the
/// order the model requested them.
pub struct ChatAgent {
    client: AzureOpenAiClient,
    instructions: String,
    name: Option<String>,
    tools: ToolRegistry,
    approval: Option<Arc<dyn ApprovalHandler>>,
    response_format: Option<ResponseFormat>,
    max_tool_rounds: usize,
}

impl ChatAgent {
    pub fn new(client: AzureOpenAiClient, instructions: impl Into<String>) -> Self {
        Self {
            client,
            instructions: instructions.into(),
            name: None,
            tools: ToolRegistry::new(),
            approval: None,
            response_format: None,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    /// Names the agent; used by workflow demos to label its output.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_approval(mut self, handler: Arc<dyn ApprovalHandler>) -> Self {
        self.approval = Some(handler);
        self
    }

    /// Forces the model to reply with a JSON object.
    pub fn with_json_response(mut self) -> Self {
        self.response_format = Some(ResponseFormat::JsonObject);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn wire_tools(&self) -> Option<Vec<ToolDefinition>> {
        if self.tools.is_empty() {
            return None;
        }
        Some(
            self.tools
                .iter()
                .map(|tool| ToolDefinition::from_tool(tool.as_ref()))
                .collect(),
        )
    }

    fn initial_messages(&self, history: &ConversationHistory) -> Vec<WireMessage> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        if !self.instructions.is_empty() {
            messages.push(WireMessage::system(&self.instructions));
        }
        messages.extend(history.messages().iter().map(WireMessage::from_conversation));
        messages
    }

    /// Resolves one requested tool invocation to its result text.
    ///
    /// Unknown tools, malformed arguments and operator rejections all
    /// become error-text results for the model; nothing here aborts the
    /// turn.
    async fn execute_call(&self, call: &ToolCall) -> ToolOutput {
        let name = call.function.name.as_str();
        let Some(tool) = self.tools.get(name) else {
            warn!(tool = name, "model requested an unregistered tool");
            return ToolOutput::error(format!("Unknown tool: {name}"));
        };

        let args: Value = match serde_json::from_str(&call.function.arguments) {
            Ok(args) => args,
            Err(e) => {
                return ToolOutput::error(format!("Error: malformed arguments for '{name}': {e}"));
            }
        };

        if tool.requires_approval() {
            let Some(handler) = &self.approval else {
                return ToolOutput::error(format!(
                    "Tool '{name}' requires approval but no approval handler is configured"
                ));
            };
            if !handler.request_approval(name, &args).await {
                debug!(tool = name, "operator rejected the invocation");
                return ToolOutput::error(format!("Function '{name}' was rejected by the user"));
            }
        }

        tool.invoke(args).await
    }
}

#[async_trait]
impl Agent for ChatAgent {
    async fn run(&self, history: &ConversationHistory) -> Result<AgentReply> {
        let mut messages = self.initial_messages(history);
        let mut usage = TokenUsage::default();

        for round in 0..=self.max_tool_rounds {
            let mut request = ChatCompletionRequest::new(messages.clone());
            request.tools = self.wire_tools();
            if request.tools.is_some() {
                request.tool_choice = Some("auto".to_string());
            }
            request.response_format = self.response_format.clone();

            let completion = self.client.complete(&request).await?;
            if let Some(wire_usage) = completion.usage {
                usage.add(TokenUsage {
                    prompt_tokens: wire_usage.prompt_tokens,
                    completion_tokens: wire_usage.completion_tokens,
                });
            }

            let choice = completion
                .choices
                .into_iter()
                .next()
                .ok_or_else(|| AgoraError::agent("chat completion contained no choices"))?;

            let reply = choice.message;
            let tool_calls = reply.tool_calls.clone().unwrap_or_default();

            if tool_calls.is_empty() {
                return Ok(AgentReply {
                    text: reply.content.unwrap_or_default(),
                    usage,
                });
            }

            debug!(round, count = tool_calls.len(), "resolving tool calls");
            messages.push(reply);
            for call in &tool_calls {
                let output = self.execute_call(call).await;
                messages.push(WireMessage::tool_result(&call.id, &output.text));
            }
        }

        Err(AgoraError::agent(format!(
            "model kept requesting tools after {} rounds",
            self.max_tool_rounds
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::Tool;
    use serde_json::json;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct DangerousTool {
        executions: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Tool for DangerousTool {
        fn name(&self) -> String {
            "wipe".to_string()
        }

        fn description(&self) -> String {
            "Wipes something".to_string()
        }

        fn parameters(&self) -> Value {
            json!({ "type": "object", "properties": {} })
        }

        fn requires_approval(&self) -> bool {
            true
        }

        async fn invoke(&self, _args: Value) -> ToolOutput {
            self.executions.fetch_add(1, Ordering::SeqCst);
            ToolOutput::success("wiped")
        }
    }

    /// Handler scripted with one decision per expected prompt.
    struct ScriptedApproval {
        decisions: Mutex<Vec<bool>>,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl ApprovalHandler for ScriptedApproval {
        async fn request_approval(&self, function_name: &str, _arguments: &Value) -> bool {
            self.prompts.lock().unwrap().push(function_name.to_string());
            self.decisions.lock().unwrap().remove(0)
        }
    }

    fn agent_under_test(
        decisions: Vec<bool>,
        executions: &Arc<AtomicUsize>,
    ) -> (ChatAgent, Arc<Mutex<Vec<String>>>) {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let mut tools = agora_core::ToolRegistry::new();
        tools.register(DangerousTool {
            executions: Arc::clone(executions),
        });

        let client = AzureOpenAiClient::new("https://example", "gpt", "key");
        let agent = ChatAgent::new(client, "test")
            .with_tools(tools)
            .with_approval(Arc::new(ScriptedApproval {
                decisions: Mutex::new(decisions),
                prompts: Arc::clone(&prompts),
            }));
        (agent, prompts)
    }

    fn call(name: &str) -> ToolCall {
        ToolCall {
            id: format!("call_{name}"),
            kind: "function".to_string(),
            function: crate::azure_openai::FunctionCall {
                name: name.to_string(),
                arguments: "{}".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn each_pending_approval_gets_its_own_prompt() {
        let executions = Arc::new(AtomicUsize::new(0));
        let (agent, prompts) = agent_under_test(vec![true, false], &executions);

        // Two dangerous calls in one turn: drained one at a time.
        let first = agent.execute_call(&call("wipe")).await;
        let second = agent.execute_call(&call("wipe")).await;

        assert_eq!(prompts.lock().unwrap().len(), 2);
        assert!(!first.is_error);
        assert!(second.is_error);
        assert!(second.text.contains("rejected"));
        // The rejected invocation never executed.
        assert_eq!(executions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_tool_becomes_an_error_result() {
        let executions = Arc::new(AtomicUsize::new(0));
        let (agent, _prompts) = agent_under_test(vec![], &executions);

        let output = agent.execute_call(&call("nonexistent")).await;
        assert!(output.is_error);
        assert!(output.text.contains("Unknown tool"));
    }

    #[tokio::test]
    async fn malformed_arguments_become_an_error_result() {
        let executions = Arc::new(AtomicUsize::new(0));
        let (agent, _prompts) = agent_under_test(vec![], &executions);

        let mut bad = call("wipe");
        bad.function.arguments = "not json".to_string();
        let output = agent.execute_call(&bad).await;

        assert!(output.is_error);
        assert!(output.text.contains("malformed arguments"));
        assert_eq!(executions.load(Ordering::SeqCst), 0);
    }
}
