//! Console approval gate for dangerous tool invocations.

use agora_interaction::ApprovalHandler;
use async_trait::async_trait;
use colored::Colorize;
use serde_json::Value;
use std::io::Write;

/// Prompts the operator on the console and blocks until they answer.
///
/// The function name and the full argument map are shown before the
/// prompt; anything other than yes/y/no/n re-prompts indefinitely.
pub struct ConsoleApprovalHandler;

#[async_trait]
impl ApprovalHandler for ConsoleApprovalHandler {
    async fn request_approval(&self, function_name: &str, arguments: &Value) -> bool {
        println!();
        println!("{}", crate::console::rule().yellow());
        println!("{}", "APPROVAL REQUIRED".yellow().bold());
        println!("{}", crate::console::rule().yellow());
        println!("Function: {}", function_name.bold());
        println!("Arguments:");
        match arguments.as_object() {
            Some(map) => {
                for (key, value) in map {
                    println!("   - {key}: {value}");
                }
            }
            None => println!("   {arguments}"),
        }
        println!("{}", "-".repeat(70).yellow());

        loop {
            print!("{}", "Do you want to APPROVE this action? (yes/no): ".yellow());
            let _ = std::io::stdout().flush();

            let mut line = String::new();
            if std::io::stdin().read_line(&mut line).is_err() {
                return false;
            }
            match line.trim().to_lowercase().as_str() {
                "yes" | "y" => return true,
                "no" | "n" => return false,
                _ => println!("   Please enter 'yes' or 'no'"),
            }
        }
    }
}
