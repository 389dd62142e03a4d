//! Agora: interactive console demos for LLM agent patterns.

mod approval;
mod console;
mod demos;

use agora_infrastructure::AppSettings;
use clap::Parser;
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "agora", about = "Interactive console demos for LLM agent patterns")]
struct Cli {
    /// Path to the settings file (defaults to appsettings.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run one demo (1-9) directly and exit
    #[arg(long)]
    demo: Option<u8>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => AppSettings::load_with_env(path)?,
        None => AppSettings::load()?,
    };

    if let Some(demo) = cli.demo {
        run_demo(&demo.to_string(), &settings).await;
        return Ok(());
    }

    loop {
        print_menu();
        let Some(choice) = read_choice() else {
            break;
        };
        let choice = choice.to_lowercase();

        match choice.as_str() {
            "q" | "quit" | "exit" => {
                console::print_goodbye();
                break;
            }
            "" => continue,
            _ => run_demo(&choice, &settings).await,
        }
    }

    Ok(())
}

fn print_menu() {
    println!();
    println!("{}", console::rule().bright_magenta());
    println!("{}", "Agora - Agent Pattern Demos".bright_magenta().bold());
    println!("{}", console::rule().bright_magenta());
    println!();
    println!("Available demos:");
    println!("  1. Multiple function tools");
    println!("  2. Human-in-the-loop approval");
    println!("  3. Structured output");
    println!("  4. Long-term memory");
    println!("  5. Middleware pipeline");
    println!("  6. MCP interactive");
    println!("  7. Sequential workflow");
    println!("  8. Concurrent workflow");
    println!("  9. Agents in workflow");
    println!();
    println!("  Q. Quit");
    println!();
    print!("Enter your choice (1-9 or Q): ");
    let _ = std::io::stdout().flush();
}

fn read_choice() -> Option<String> {
    let mut line = String::new();
    match std::io::stdin().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

async fn run_demo(choice: &str, settings: &AppSettings) {
    let result = match choice {
        "1" => demos::multiple_tools::run(settings).await,
        "2" => demos::human_in_the_loop::run(settings).await,
        "3" => demos::structured_output::run(settings).await,
        "4" => demos::long_term_memory::run(settings).await,
        "5" => demos::middleware::run(settings).await,
        "6" => demos::mcp_interactive::run(settings).await,
        "7" => demos::sequential_workflow::run(settings).await,
        "8" => demos::concurrent_workflow::run(settings).await,
        "9" => demos::agents_in_workflow::run(settings).await,
        _ => {
            println!("{}", "Invalid choice. Please try again.".red());
            return;
        }
    };

    if let Err(e) = result {
        console::print_error(&e.to_string());
        if e.is_config() {
            console::print_note("Check your appsettings.json file or environment variables.");
        }
    }
}
