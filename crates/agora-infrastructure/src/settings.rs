//! Application settings.
//!
//! Settings come from `appsettings.json` in the working directory, with
//! `~/.config/agora/appsettings.json` as a fallback, and environment
//! variables overriding either. Section and key names keep the
//! PascalCase of the settings file format.

use agora_core::{AgoraError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "appsettings.json";
pub const DEFAULT_API_VERSION: &str = "2024-07-01-preview";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppSettings {
    #[serde(rename = "AzureAI", default)]
    pub azure_ai: AzureAiSettings,
    #[serde(rename = "AzureOpenAI", default)]
    pub azure_open_ai: AzureOpenAiSettings,
    #[serde(rename = "GitHubMCP", default)]
    pub github_mcp: GitHubMcpSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AzureAiSettings {
    #[serde(rename = "ProjectEndpoint")]
    pub project_endpoint: String,
    #[serde(rename = "ModelDeploymentName")]
    pub model_deployment_name: String,
    #[serde(rename = "AgentId")]
    pub agent_id: String,
    #[serde(rename = "VectorStoreId")]
    pub vector_store_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AzureOpenAiSettings {
    #[serde(rename = "Endpoint")]
    pub endpoint: String,
    #[serde(rename = "ModelName")]
    pub model_name: String,
    #[serde(rename = "ApiKey")]
    pub api_key: String,
    #[serde(rename = "ApiVersion")]
    pub api_version: String,
}

impl Default for AzureOpenAiSettings {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            model_name: String::new(),
            api_key: String::new(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GitHubMcpSettings {
    #[serde(rename = "GitHubPersonalAccessToken")]
    pub github_personal_access_token: String,
}

impl AppSettings {
    /// Loads settings from the default locations and applies environment
    /// overrides. A missing file yields defaults (the environment may
    /// still fill everything in); a malformed file is a config error.
    pub fn load() -> Result<Self> {
        let mut settings = match Self::resolve_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        settings.apply_overrides(|name| std::env::var(name).ok());
        Ok(settings)
    }

    /// Loads settings from an explicit file and applies environment
    /// overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let mut settings = Self::load_from(path)?;
        settings.apply_overrides(|name| std::env::var(name).ok());
        Ok(settings)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AgoraError::config(format!(
                "Failed to read settings file at {}: {e}",
                path.display()
            ))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            AgoraError::config(format!(
                "Failed to parse settings file at {}: {e}",
                path.display()
            ))
        })
    }

    fn resolve_path() -> Option<PathBuf> {
        let local = PathBuf::from(SETTINGS_FILE);
        if local.exists() {
            return Some(local);
        }
        let fallback = dirs::home_dir()?.join(".config").join("agora").join(SETTINGS_FILE);
        fallback.exists().then_some(fallback)
    }

    /// Applies overrides from an environment-like lookup. Split out from
    /// [`Self::load`] so tests can drive it with a plain closure.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let overrides: [(&str, &mut String); 5] = [
            ("AZURE_OPENAI_ENDPOINT", &mut self.azure_open_ai.endpoint),
            ("AZURE_OPENAI_MODEL", &mut self.azure_open_ai.model_name),
            ("AZURE_OPENAI_API_KEY", &mut self.azure_open_ai.api_key),
            ("AZURE_AI_PROJECT_ENDPOINT", &mut self.azure_ai.project_endpoint),
            (
                "GITHUB_PERSONAL_ACCESS_TOKEN",
                &mut self.github_mcp.github_personal_access_token,
            ),
        ];
        for (name, slot) in overrides {
            if let Some(value) = lookup(name) {
                if !value.is_empty() {
                    *slot = value;
                }
            }
        }
    }

    /// Validates the Azure OpenAI section, naming every missing field.
    pub fn validated_azure_open_ai(&self) -> Result<&AzureOpenAiSettings> {
        let settings = &self.azure_open_ai;
        let mut missing = Vec::new();
        if settings.endpoint.trim().is_empty() {
            missing.push("Endpoint");
        }
        if settings.model_name.trim().is_empty() {
            missing.push("ModelName");
        }
        if settings.api_key.trim().is_empty() {
            missing.push("ApiKey");
        }
        if !missing.is_empty() {
            return Err(AgoraError::missing_config("Azure OpenAI", &missing));
        }
        Ok(settings)
    }

    /// Validates the Azure AI section, naming every missing field.
    pub fn validated_azure_ai(&self) -> Result<&AzureAiSettings> {
        let settings = &self.azure_ai;
        let mut missing = Vec::new();
        if settings.project_endpoint.trim().is_empty() {
            missing.push("ProjectEndpoint");
        }
        if settings.model_deployment_name.trim().is_empty() {
            missing.push("ModelDeploymentName");
        }
        if !missing.is_empty() {
            return Err(AgoraError::missing_config("Azure AI", &missing));
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_settings(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn parses_pascal_case_sections() {
        let (_dir, path) = write_settings(
            r#"{
                "AzureOpenAI": {
                    "Endpoint": "https://example.openai.azure.com",
                    "ModelName": "gpt-4o",
                    "ApiKey": "key-123"
                },
                "GitHubMCP": {
                    "GitHubPersonalAccessToken": "ghp_token"
                }
            }"#,
        );

        let settings = AppSettings::load_from(&path).unwrap();
        assert_eq!(settings.azure_open_ai.model_name, "gpt-4o");
        assert_eq!(settings.azure_open_ai.api_version, DEFAULT_API_VERSION);
        assert_eq!(
            settings.github_mcp.github_personal_access_token,
            "ghp_token"
        );
        assert!(settings.validated_azure_open_ai().is_ok());
    }

    #[test]
    fn validation_names_every_missing_field() {
        let settings = AppSettings::default();

        let err = settings.validated_azure_open_ai().unwrap_err();
        let text = err.to_string();
        assert!(err.is_config());
        assert!(text.contains("Endpoint"));
        assert!(text.contains("ModelName"));
        assert!(text.contains("ApiKey"));

        let err = settings.validated_azure_ai().unwrap_err();
        let text = err.to_string();
        assert!(text.contains("ProjectEndpoint"));
        assert!(text.contains("ModelDeploymentName"));
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let (_dir, path) = write_settings("{ not json");
        let err = AppSettings::load_from(&path).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppSettings::load_from(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn overrides_replace_file_values() {
        let (_dir, path) = write_settings(
            r#"{ "AzureOpenAI": { "Endpoint": "https://file", "ModelName": "gpt", "ApiKey": "from-file" } }"#,
        );
        let mut settings = AppSettings::load_from(&path).unwrap();

        settings.apply_overrides(|name| {
            (name == "AZURE_OPENAI_API_KEY").then(|| "from-env".to_string())
        });

        assert_eq!(settings.azure_open_ai.api_key, "from-env");
        assert_eq!(settings.azure_open_ai.endpoint, "https://file");
    }

    #[test]
    fn empty_overrides_are_ignored() {
        let mut settings = AppSettings::default();
        settings.azure_open_ai.api_key = "keep".to_string();
        settings.apply_overrides(|name| {
            (name == "AZURE_OPENAI_API_KEY").then(String::new)
        });
        assert_eq!(settings.azure_open_ai.api_key, "keep");
    }
}
