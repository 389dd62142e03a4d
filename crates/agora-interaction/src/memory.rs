//! AI-powered long-term memory.
//!
//! After each turn's reply has been shown, the extractor asks the model
//! whether the user's message contained facts worth remembering, merges
//! whatever comes back into the profile, and persists it. Extraction
//! never affects the turn that produced it — only subsequent turns see
//! the updated profile.

use crate::agent::Agent;
use agora_core::{ConversationHistory, UserProfile};
use agora_infrastructure::ProfileStorage;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Messages shorter than this carry nothing worth analyzing.
const MIN_MESSAGE_LEN: usize = 3;

/// Extracts and persists facts learned about the user.
pub struct MemoryExtractor {
    agent: Arc<dyn Agent>,
    storage: ProfileStorage,
    profile: UserProfile,
}

impl MemoryExtractor {
    /// Loads the existing profile from storage.
    pub fn new(agent: Arc<dyn Agent>, storage: ProfileStorage) -> Self {
        let profile = storage.load();
        Self {
            agent,
            storage,
            profile,
        }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Renders the profile as a system-prompt block, or an empty string
    /// when nothing has been learned yet.
    pub fn profile_context(&self) -> String {
        if self.profile.is_empty() {
            return String::new();
        }

        let facts = self
            .profile
            .entries()
            .map(|(key, value)| format!("- {key}: {value}"))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "[USER PROFILE - LONG-TERM MEMORY]:\n{facts}\n\n\
             This is information about the user that persists across all conversations.\n\
             Reference it naturally when relevant, and be enthusiastic when recognizing the user!"
        )
    }

    /// Analyzes one user message and merges any newly learned facts.
    ///
    /// Every failure mode — model error, commentary-wrapped reply,
    /// unparsable payload — is swallowed and logged; the profile simply
    /// does not change that turn. Returns the facts that were applied.
    pub async fn analyze_and_extract(&mut self, user_message: &str) -> Vec<(String, String)> {
        if user_message.trim().len() < MIN_MESSAGE_LEN {
            return Vec::new();
        }

        let mut history = ConversationHistory::new();
        history.push_user(analysis_prompt(user_message, &self.profile));

        let reply = match self.agent.run(&history).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "memory extraction call failed");
                return Vec::new();
            }
        };

        let Some(payload) = isolate_json(&reply.text) else {
            debug!("extraction reply contained no JSON object");
            return Vec::new();
        };

        let parsed: BTreeMap<String, Value> = match serde_json::from_str(payload) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "could not parse extraction payload");
                return Vec::new();
            }
        };

        let entries: Vec<(String, String)> = parsed
            .into_iter()
            .filter_map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s,
                    Value::Null => return None,
                    other => other.to_string(),
                };
                let text = text.trim().to_string();
                (!text.is_empty()).then_some((key, text))
            })
            .collect();

        if entries.is_empty() {
            return Vec::new();
        }

        self.profile.merge(entries.iter().cloned());
        self.storage.save(&self.profile);
        entries
    }
}

/// Isolates the JSON object between the first `{` and the last `}`,
/// tolerating leading/trailing commentary from the model.
fn isolate_json(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end >= start).then(|| &reply[start..=end])
}

fn analysis_prompt(user_message: &str, profile: &UserProfile) -> String {
    let current = serde_json::to_string(profile).unwrap_or_else(|_| "{}".to_string());

    format!(
        "Analyze this user message and extract any personal information worth remembering \
         for future conversations.\n\n\
         User message: \"{user_message}\"\n\n\
         Current profile: {current}\n\n\
         Extract ONLY factual information about the user (name, age, profession, preferences, \
         hobbies, etc.).\n\
         Return as JSON format: {{\"key\": \"value\", \"key2\": \"value2\"}}\n\
         If nothing important, return empty: {{}}\n\n\
         Examples:\n\
         - \"My name is Alice\" -> {{\"name\": \"Alice\"}}\n\
         - \"I'm a teacher\" -> {{\"profession\": \"teacher\"}}\n\
         - \"I love pizza and my favorite color is blue\" -> \
         {{\"favorite_food\": \"pizza\", \"favorite_color\": \"blue\"}}\n\
         - \"How are you?\" -> {{}}\n\n\
         Extract only NEW or UPDATED information. Be concise with values.\n\
         JSON only, no explanation:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentReply;
    use agora_core::Result;
    use async_trait::async_trait;

    struct ScriptedAgent {
        reply: String,
    }

    #[async_trait]
    impl Agent for ScriptedAgent {
        async fn run(&self, _history: &ConversationHistory) -> Result<AgentReply> {
            Ok(AgentReply::text(self.reply.clone()))
        }
    }

    fn extractor_with_reply(reply: &str) -> (MemoryExtractor, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage = ProfileStorage::new(dir.path().join("memory.json"));
        let extractor = MemoryExtractor::new(
            Arc::new(ScriptedAgent {
                reply: reply.to_string(),
            }),
            storage,
        );
        (extractor, dir)
    }

    #[test]
    fn isolate_json_tolerates_commentary() {
        assert_eq!(
            isolate_json("Sure! {\"name\": \"Alice\"} hope that helps"),
            Some("{\"name\": \"Alice\"}")
        );
        assert_eq!(isolate_json("no braces here"), None);
        assert_eq!(isolate_json("{}"), Some("{}"));
    }

    #[tokio::test]
    async fn learned_facts_are_merged_and_persisted() {
        let (mut extractor, dir) =
            extractor_with_reply("Here you go: {\"name\": \"Alice\", \"city\": \"Paris\"}");

        let applied = extractor.analyze_and_extract("My name is Alice, I live in Paris").await;
        assert_eq!(applied.len(), 2);
        assert_eq!(extractor.profile().get("name"), Some("Alice"));

        // A fresh extractor over the same file sees the saved facts.
        let storage = ProfileStorage::new(dir.path().join("memory.json"));
        assert_eq!(storage.load().get("city"), Some("Paris"));
    }

    #[tokio::test]
    async fn repeated_identical_extraction_is_idempotent() {
        let (mut extractor, _dir) = extractor_with_reply("{\"name\": \"Alice\"}");

        extractor.analyze_and_extract("My name is Alice").await;
        extractor.analyze_and_extract("My name is Alice").await;

        assert_eq!(extractor.profile().len(), 1);
        assert_eq!(extractor.profile().get("name"), Some("Alice"));
    }

    #[tokio::test]
    async fn non_json_reply_leaves_profile_untouched() {
        let (mut extractor, _dir) = extractor_with_reply("I could not find anything relevant.");

        let applied = extractor.analyze_and_extract("What's the weather like?").await;
        assert!(applied.is_empty());
        assert!(extractor.profile().is_empty());
    }

    #[tokio::test]
    async fn null_and_empty_values_are_dropped() {
        let (mut extractor, _dir) =
            extractor_with_reply("{\"name\": \"Bob\", \"age\": null, \"hobby\": \"\"}");

        let applied = extractor.analyze_and_extract("I'm Bob").await;
        assert_eq!(applied.len(), 1);
        assert_eq!(extractor.profile().len(), 1);
    }

    #[tokio::test]
    async fn short_messages_are_skipped() {
        let (mut extractor, _dir) = extractor_with_reply("{\"x\": \"y\"}");
        let applied = extractor.analyze_and_extract("hi").await;
        assert!(applied.is_empty());
        assert!(extractor.profile().is_empty());
    }

    #[tokio::test]
    async fn profile_context_is_empty_without_facts() {
        let (extractor, _dir) = extractor_with_reply("{}");
        assert!(extractor.profile_context().is_empty());
    }

    #[tokio::test]
    async fn profile_context_lists_every_fact() {
        let (mut extractor, _dir) = extractor_with_reply("{\"name\": \"Alice\"}");
        extractor.analyze_and_extract("My name is Alice").await;

        let context = extractor.profile_context();
        assert!(context.contains("LONG-TERM MEMORY"));
        assert!(context.contains("- name: Alice"));
    }
}
