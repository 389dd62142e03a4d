//! User profile model for the long-term memory demo.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Facts learned about a user across conversations.
///
/// Keys are unique; merging overwrites existing keys and drops empty
/// values, which makes repeated identical merges idempotent. The map is
/// ordered so that display output and serialized files are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile {
    facts: BTreeMap<String, String>,
}

impl UserProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.facts.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Merges newly extracted facts into the profile.
    ///
    /// Entries with an empty key or value are dropped; existing keys are
    /// overwritten. Returns the number of entries applied.
    pub fn merge(&mut self, entries: impl IntoIterator<Item = (String, String)>) -> usize {
        let mut applied = 0;
        for (key, value) in entries {
            let key = key.trim();
            let value = value.trim();
            if key.is_empty() || value.is_empty() {
                continue;
            }
            self.facts.insert(key.to_string(), value.to_string());
            applied += 1;
        }
        applied
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.facts.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_overwrites_existing_keys() {
        let mut profile = UserProfile::new();
        profile.merge([("name".to_string(), "Alice".to_string())]);
        profile.merge([("name".to_string(), "Bob".to_string())]);

        assert_eq!(profile.len(), 1);
        assert_eq!(profile.get("name"), Some("Bob"));
    }

    #[test]
    fn merge_is_idempotent_for_identical_extractions() {
        let mut profile = UserProfile::new();
        profile.merge([("name".to_string(), "Alice".to_string())]);
        profile.merge([("name".to_string(), "Alice".to_string())]);

        assert_eq!(profile.len(), 1);
        assert_eq!(profile.get("name"), Some("Alice"));
    }

    #[test]
    fn merge_drops_empty_values() {
        let mut profile = UserProfile::new();
        let applied = profile.merge([
            ("name".to_string(), "Alice".to_string()),
            ("hobby".to_string(), "  ".to_string()),
            ("".to_string(), "orphan".to_string()),
        ]);

        assert_eq!(applied, 1);
        assert_eq!(profile.len(), 1);
        assert_eq!(profile.get("hobby"), None);
    }
}
