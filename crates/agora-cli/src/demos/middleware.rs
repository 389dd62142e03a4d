//! Demo 5: middleware pipeline around the agent.

use crate::console;
use agora_core::tool::{Calculate, GetTime, GetWeather, SearchDatabase};
use agora_core::{ConversationHistory, Result, ToolRegistry};
use agora_infrastructure::AppSettings;
use agora_interaction::{
    Agent, ChatAgent, MiddlewarePipeline, SecurityMiddleware, TimingMiddleware,
};
use colored::Colorize;

const INSTRUCTIONS: &str = "You are a helpful assistant with access to various tools. \
    Be friendly, concise, and helpful in your responses.";

pub async fn run(settings: &AppSettings) -> Result<()> {
    let azure = settings.validated_azure_open_ai()?;

    console::print_banner(
        "Middleware Pipeline",
        "Two middleware stages wrap every request: timing observes, security can veto.",
    );

    println!("Suggested test prompts:");
    println!("   - \"tell me a joke\"                       (timing only)");
    println!("   - \"what's the weather in Tokyo?\"         (timing + tool call)");
    println!("   - \"what time is it and calculate 15 * 8\" (multiple tool calls)");
    println!("   - \"what is my password?\"                 (security blocks this)");
    println!("   - \"search for users and get weather in Paris\"");
    println!();

    let mut tools = ToolRegistry::new();
    tools.register(GetWeather);
    tools.register(Calculate);
    tools.register(GetTime::new());
    tools.register(SearchDatabase);

    let agent = ChatAgent::new(super::openai_client(azure), INSTRUCTIONS).with_tools(tools);
    let pipeline = MiddlewarePipeline::builder(agent)
        .with(TimingMiddleware)
        .with(SecurityMiddleware::new())
        .build();

    console::print_note("Agent created with timing and security middleware");
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
        match pipeline.run(&history).await {
            Ok(reply) => {
                console::print_agent_reply(&reply.text);
                history.push_assistant(&reply.text);
            }
            Err(e) if e.is_security_blocked() => {
                // Surfaced as a refusal; the session continues.
                println!("{}", format!("Blocked: {e}").red().bold());
                println!();
            }
            Err(e) => console::print_error(&format!("Error during chat: {e}")),
        }
    }

    Ok(())
}
