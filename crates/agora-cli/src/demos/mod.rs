//! One module per demo.

pub mod agents_in_workflow;
pub mod concurrent_workflow;
pub mod human_in_the_loop;
pub mod long_term_memory;
pub mod mcp_interactive;
pub mod middleware;
pub mod multiple_tools;
pub mod sequential_workflow;
pub mod structured_output;

use agora_infrastructure::settings::AzureOpenAiSettings;
use agora_interaction::AzureOpenAiClient;

/// Sandbox directory for the file tools.
pub const DEMO_FILES_DIR: &str = "demo_files";

pub fn openai_client(settings: &AzureOpenAiSettings) -> AzureOpenAiClient {
    AzureOpenAiClient::new(&settings.endpoint, &settings.model_name, &settings.api_key)
        .with_api_version(&settings.api_version)
}
