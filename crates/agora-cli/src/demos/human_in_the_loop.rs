//! Demo 2: safe vs dangerous operations with an approval gate.

use crate::approval::ConsoleApprovalHandler;
use crate::console;
use agora_core::tool::{CreateFile, DeleteFile};
use agora_core::{ConversationHistory, Result, ToolRegistry};
use agora_infrastructure::AppSettings;
use agora_interaction::{Agent, ChatAgent};
use std::sync::Arc;

const INSTRUCTIONS: &str = "You are a file management assistant with access to file operations.\n\n\
    IMPORTANT: You MUST call the functions directly. Do NOT ask the user for permission in chat.\n\n\
    Rules:\n\
    1. When user asks to create a file: IMMEDIATELY call create_file()\n\
    2. When user asks to delete a file: IMMEDIATELY call delete_file()\n\
    3. Do NOT ask for confirmation in the chat - the system handles approvals\n\
    4. Just call the function and report the result";

pub async fn run(settings: &AppSettings) -> Result<()> {
    let azure = settings.validated_azure_open_ai()?;

    console::print_banner(
        "Human-in-the-Loop - Create vs Delete",
        "This demo shows safe vs dangerous operations with an approval workflow.",
    );

    println!("This demo has 2 functions:");
    println!("   create_file() - runs immediately (no approval)");
    println!("   delete_file() - requires your approval first");
    println!();

    let demo_dir = super::DEMO_FILES_DIR;
    match std::fs::create_dir_all(demo_dir) {
        Ok(()) => console::print_note(&format!("Files will be created in: {demo_dir}/")),
        Err(e) => console::print_note(&format!(
            "Warning: could not create demo directory: {e}. File operations may fail."
        )),
    }

    let mut tools = ToolRegistry::new();
    tools.register(CreateFile::new(demo_dir));
    tools.register(DeleteFile::new(demo_dir));

    let agent = ChatAgent::new(super::openai_client(azure), INSTRUCTIONS)
        .with_tools(tools)
        .with_approval(Arc::new(ConsoleApprovalHandler));

    println!();
    println!("Try these commands:");
    println!("   - Create a file named test.txt with some content");
    println!("   - Delete test.txt");
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
