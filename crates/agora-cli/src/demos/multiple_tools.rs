//! Demo 1: an agent with several tools, chosen automatically.

use crate::console;
use agora_core::tool::{Calculate, GetTime, GetWeather};
use agora_core::{ConversationHistory, Result, ToolRegistry};
use agora_infrastructure::AppSettings;
use agora_interaction::{Agent, ChatAgent};

const INSTRUCTIONS: &str = "You are a helpful assistant with weather, calculator, and time \
    tools. Choose the right tool automatically based on the user's question.";

pub async fn run(settings: &AppSettings) -> Result<()> {
    let azure = settings.validated_azure_open_ai()?;

    console::print_banner(
        "Multiple Function Tools",
        "This demo shows an agent with multiple tools that automatically chooses the right one.",
    );

    let mut tools = ToolRegistry::new();
    tools.register(GetWeather);
    tools.register(Calculate);
    tools.register(GetTime::new());

    let agent = ChatAgent::new(super::openai_client(azure), INSTRUCTIONS).with_tools(tools);

    console::print_note("Agent created with 3 tools: weather, calculator, time zone");
    println!();

    let mut rl = console::editor()?;
    let mut history = ConversationHistory::new();

    loop {
        let Some(input) = console::read_line(&mut rl, "You: ") else {
            break;
        };
        if input.is_empty() {
            continue;
        }
        if console::should_exit(&input) {
            console::print_goodbye();
            break;
        }

        history.push_user(&input);
        match agent.run(&history).await {
            Ok(reply) => {
                console::print_agent_reply(&reply.text);
                history.push_assistant(&reply.text);
            }
            Err(e) => console::print_error(&format!("Error during chat: {e}")),
        }
    }

    Ok(())
}
