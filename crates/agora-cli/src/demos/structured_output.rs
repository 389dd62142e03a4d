//! Demo 3: structured data extraction with switchable schemas.

use crate::console;
use agora_core::{ConversationHistory, Result};
use agora_infrastructure::AppSettings;
use agora_interaction::extraction::{ExtractedRecord, SchemaKind};
use agora_interaction::{Agent, AzureOpenAiClient, ChatAgent};
use colored::Colorize;
use std::str::FromStr;
use strum::IntoEnumIterator;

pub async fn run(settings: &AppSettings) -> Result<()> {
    let azure = settings.validated_azure_open_ai()?;
    let client = super::openai_client(azure);

    let mut schema = SchemaKind::Person;
    print_welcome(schema);

    let mut rl = console::editor()?;

    loop {
        let prompt = format!("You ({schema}): ");
        let Some(input) = console::read_line(&mut rl, &prompt) else {
            break;
        };
        if input.is_empty() {
            continue;
        }
        if console::should_exit(&input) {
            console::print_goodbye();
            break;
        }

        if handle_command(&input, &mut schema) {
            continue;
        }

        extract(&client, schema, &input).await;
    }

    Ok(())
}

/// Returns true when the input was a demo command.
fn handle_command(input: &str, schema: &mut SchemaKind) -> bool {
    let mut parts = input.split_whitespace();
    let command = parts.next().unwrap_or("").to_lowercase();

    match command.as_str() {
        "schema" => {
            match parts.next().map(str::to_lowercase) {
                Some(name) => match SchemaKind::from_str(&name) {
                    Ok(kind) => {
                        *schema = kind;
                        println!("{}", format!("Switched to '{kind}' schema").green());
                        print_fields(kind);
                    }
                    Err(_) => {
                        console::print_error(&format!("Unknown schema '{name}'"));
                        println!(
                            "Available schemas: {}",
                            SchemaKind::iter()
                                .map(|k| k.to_string())
                                .collect::<Vec<_>>()
                                .join(", ")
                        );
                    }
                },
                None => console::print_error("Usage: schema <name>"),
            }
            true
        }
        "schemas" => {
            for kind in SchemaKind::iter() {
                println!("\n{}", kind.to_string().bold());
                print_fields(kind);
            }
            println!();
            true
        }
        "help" => {
            print_welcome(*schema);
            true
        }
        _ => false,
    }
}

async fn extract(client: &AzureOpenAiClient, schema: SchemaKind, input: &str) {
    println!("{}", format!("Extracting {schema} information...").bright_black());

    let agent = ChatAgent::new(client.clone(), schema.instructions()).with_json_response();
    let mut history = ConversationHistory::new();
    history.push_user(input);

    let reply = match agent.run(&history).await {
        Ok(reply) => reply,
        Err(e) => {
            console::print_error(&format!("Error during extraction: {e}"));
            return;
        }
    };

    match ExtractedRecord::parse(schema, &reply.text) {
        Ok(record) if record.has_any_data() => {
            println!("\nExtracted {schema} information:");
            for (label, value) in record.display_map() {
                println!("   {label}: {value}");
            }
            let map = record.display_map();
            let filled = map
                .iter()
                .filter(|(_, v)| v != agora_interaction::extraction::NOT_SPECIFIED)
                .count();
            println!(
                "\n{}",
                format!(
                    "Extraction confidence: {:.1}% ({filled}/{} fields)",
                    record.confidence(),
                    map.len()
                )
                .bright_black()
            );
            println!();
        }
        Ok(_) => {
            console::print_error(&format!(
                "Could not extract {schema} information from the provided text"
            ));
            console::print_note("Try providing more detail or switch to a different schema");
        }
        Err(e) => console::print_error(&format!("Could not parse the model's reply: {e}")),
    }
}

fn print_fields(kind: SchemaKind) {
    for line in kind.field_help() {
        println!("   - {line}");
    }
}

fn print_welcome(schema: SchemaKind) {
    console::print_banner(
        "Structured Output",
        "This demo extracts structured data from your text using the model.",
    );
    println!("Current extraction schema: {}", schema.to_string().bold());
    println!("\nCurrent schema fields:");
    print_fields(schema);
    println!("\nCommands:");
    println!("   - Type text to extract information");
    println!("   - 'schema <name>' - switch extraction schema");
    println!("   - 'schemas' - list available schemas");
    println!("   - 'help' - show this help");
    println!("   - 'quit' - exit demo");
    println!("\nExample inputs:");
    println!("   - 'John is 30 years old, works as a software engineer in Seattle'");
    println!("   - 'Apple Inc. is a technology company founded in 1976 in Cupertino'");
    println!("   - 'iPhone 15 is a smartphone by Apple priced at $999'");
    println!();
}
