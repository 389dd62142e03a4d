//! Error types for the Agora workspace.

use thiserror::Error;

/// A shared error type for the whole workspace.
///
/// Tool failures are deliberately *not* represented here: a failing tool
/// returns an error-flagged [`crate::ToolOutput`] to the model instead of
/// propagating an error to the chat loop.
#[derive(Error, Debug, Clone)]
pub enum AgoraError {
    /// Configuration error (fatal at startup, names the missing fields)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Raised by the security middleware stage when a denylisted keyword
    /// is found in the latest user message
    #[error("Request blocked due to sensitive content: {keyword}")]
    SecurityBlocked { keyword: String },

    /// Failure while talking to the model endpoint
    #[error("Agent error: {0}")]
    Agent(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Workflow execution error
    #[error("Workflow error: {0}")]
    Workflow(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AgoraError {
    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Config error naming each missing field
    pub fn missing_config(section: &str, missing: &[&str]) -> Self {
        Self::Config(format!(
            "Missing {} configuration: {}. Please check your appsettings.json file.",
            section,
            missing.join(", ")
        ))
    }

    /// Creates an Agent error
    pub fn agent(message: impl Into<String>) -> Self {
        Self::Agent(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Workflow error
    pub fn workflow(message: impl Into<String>) -> Self {
        Self::Workflow(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is a security block from the middleware chain
    pub fn is_security_blocked(&self) -> bool {
        matches!(self, Self::SecurityBlocked { .. })
    }
}

impl From<std::io::Error> for AgoraError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for AgoraError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// A type alias for `Result<T, AgoraError>`.
pub type Result<T> = std::result::Result<T, AgoraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_names_every_field() {
        let err = AgoraError::missing_config("Azure OpenAI", &["Endpoint", "ApiKey"]);
        let text = err.to_string();
        assert!(text.contains("Endpoint"));
        assert!(text.contains("ApiKey"));
        assert!(err.is_config());
    }

    #[test]
    fn security_blocked_is_detectable() {
        let err = AgoraError::SecurityBlocked {
            keyword: "password".into(),
        };
        assert!(err.is_security_blocked());
        assert!(err.to_string().contains("password"));
    }
}
