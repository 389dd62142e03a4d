//! Demo 4: AI-powered long-term memory with file persistence.

use crate::console;
use agora_core::{ConversationHistory, Result};
use agora_infrastructure::{AppSettings, ProfileStorage};
use agora_interaction::{Agent, ChatAgent, MemoryExtractor};
use colored::Colorize;
use std::sync::Arc;

const MEMORY_FILE: &str = "ai_memory_profile.json";

fn system_instructions(profile_context: &str) -> String {
    let mut instructions =
        String::from("You are a helpful, friendly assistant with long-term memory.\n\n");
    if !profile_context.is_empty() {
        instructions.push_str(profile_context);
        instructions.push('\n');
    }
    instructions.push_str(
        "\nWhen you recognize information about the user from their profile:\n\
         - Reference it naturally in conversation\n\
         - Be enthusiastic when you recognize them\n\
         - Provide personalized responses based on what you know\n\n\
         Be conversational and warm!",
    );
    instructions
}

pub async fn run(settings: &AppSettings) -> Result<()> {
    let azure = settings.validated_azure_open_ai()?;
    let client = super::openai_client(azure);

    console::print_banner(
        "Long-Term Memory",
        "The model extracts facts about you and persists them across conversations.",
    );
    console::print_note(&format!("Memory file: {MEMORY_FILE}"));

    let extraction_agent = ChatAgent::new(client.clone(), "");
    let mut memory = MemoryExtractor::new(
        Arc::new(extraction_agent),
        ProfileStorage::new(MEMORY_FILE),
    );

    if memory.profile().is_empty() {
        console::print_note("No existing memory file found, starting fresh");
    } else {
        println!("{}", "Restored profile:".green());
        for (key, value) in memory.profile().entries() {
            println!("   - {key}: {value}");
        }
    }

    let chat_agent = ChatAgent::new(client, "");
    let mut history = ConversationHistory::new();
    history.push_system(system_instructions(&memory.profile_context()));

    println!();
    println!("Commands:");
    println!("   - Chat naturally - facts are extracted and saved to file");
    println!("   - 'new' - start a new conversation (tests cross-conversation memory)");
    println!("   - 'profile' - show what has been learned about you");
    println!("   - 'quit' - exit");

    let mut conversation_num = 1;
    println!("\n{}", format!("CONVERSATION #{conversation_num} started").bold());
    println!();

    let mut rl = console::editor()?;

    loop {
        let Some(input) = console::read_line(&mut rl, "You: ") else {
            break;
        };
        if input.is_empty() {
            continue;
        }

        if console::should_exit(&input) {
            println!();
            if memory.profile().is_empty() {
                console::print_note("(No profile data learned)");
            } else {
                println!("{}", "Final learned profile:".bold());
                for (key, value) in memory.profile().entries() {
                    println!("   - {key}: {value}");
                }
            }
            console::print_goodbye();
            break;
        }

        if input.eq_ignore_ascii_case("new") {
            history.clear();
            history.push_system(system_instructions(&memory.profile_context()));
            conversation_num += 1;
            println!(
                "\n{}",
                format!("CONVERSATION #{conversation_num} started").bold()
            );
            println!();
            continue;
        }

        if input.eq_ignore_ascii_case("profile") {
            if memory.profile().is_empty() {
                console::print_note("(Nothing has been learned about you yet)");
            } else {
                println!("{}", "Learned profile:".bold());
                for (key, value) in memory.profile().entries() {
                    println!("   - {key}: {value}");
                }
            }
            println!();
            continue;
        }

        history.push_user(&input);
        match chat_agent.run(&history).await {
            Ok(reply) => {
                console::print_agent_reply(&reply.text);
                history.push_assistant(&reply.text);

                // Extraction runs only after the reply has been shown, so
                // profile updates affect later turns, never this one.
                for (key, value) in memory.analyze_and_extract(&input).await {
                    println!("{}", format!("   [learned] {key} = {value}").green());
                }
            }
            Err(e) => console::print_error(&format!("Error during chat: {e}")),
        }
    }

    Ok(())
}
