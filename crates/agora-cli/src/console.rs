//! Console helpers shared by every demo.

use agora_core::{AgoraError, Result};
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// Keywords that end a demo's chat loop.
pub const EXIT_KEYWORDS: [&str; 5] = ["quit", "exit", "q", "bye", "stop"];

const RULE_WIDTH: usize = 70;

pub fn should_exit(input: &str) -> bool {
    EXIT_KEYWORDS.contains(&input.to_lowercase().as_str())
}

pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

pub fn print_banner(title: &str, description: &str) {
    println!();
    println!("{}", rule().bright_magenta());
    println!("{}", format!("DEMO: {title}").bright_magenta().bold());
    println!("{}", rule().bright_magenta());
    if !description.is_empty() {
        println!();
        println!("{description}");
    }
    println!();
    println!(
        "{}",
        "Interactive chat (type 'quit' to exit)".bright_black()
    );
    println!();
}

pub fn print_error(message: &str) {
    eprintln!("{}", format!("Error: {message}").red());
}

pub fn print_goodbye() {
    println!("{}", "Goodbye!".bright_green());
}

pub fn print_note(message: &str) {
    println!("{}", message.bright_black());
}

pub fn print_agent_reply(text: &str) {
    println!("{}", "Agent:".bright_blue().bold());
    for line in text.lines() {
        println!("{}", line.bright_blue());
    }
    println!();
}

pub fn editor() -> Result<DefaultEditor> {
    DefaultEditor::new()
        .map_err(|e| AgoraError::internal(format!("could not initialize readline: {e}")))
}

/// Reads one trimmed line from the console.
///
/// Returns `None` when the console is closed (EOF) or unrecoverable;
/// Ctrl-C yields an empty line so the caller simply re-prompts.
pub fn read_line(rl: &mut DefaultEditor, prompt: &str) -> Option<String> {
    match rl.readline(prompt) {
        Ok(line) => {
            let trimmed = line.trim().to_string();
            if !trimmed.is_empty() {
                let _ = rl.add_history_entry(&line);
            }
            Some(trimmed)
        }
        Err(ReadlineError::Interrupted) => {
            println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            Some(String::new())
        }
        Err(ReadlineError::Eof) => None,
        Err(e) => {
            print_error(&format!("console read failed: {e}"));
            None
        }
    }
}
