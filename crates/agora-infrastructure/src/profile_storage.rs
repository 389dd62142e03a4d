//! File-backed user profile persistence.
//!
//! The profile is stored as `{ "timestamp": ..., "profile": { .. } }` at
//! a fixed path. Loading tolerates a missing or malformed file (empty
//! profile plus a warning); saving logs failures instead of raising —
//! the in-memory profile stays valid either way.

use agora_core::UserProfile;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Serialize, Deserialize)]
struct ProfileDocument {
    timestamp: String,
    profile: UserProfile,
}

/// Repository for one profile file.
pub struct ProfileStorage {
    path: PathBuf,
}

impl ProfileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored profile. Never fails: a missing file yields an
    /// empty profile, a malformed one yields an empty profile and a
    /// logged warning.
    pub fn load(&self) -> UserProfile {
        if !self.path.exists() {
            return UserProfile::new();
        }

        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read profile file");
                return UserProfile::new();
            }
        };

        match serde_json::from_str::<ProfileDocument>(&content) {
            Ok(document) => document.profile,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "malformed profile file, starting empty");
                UserProfile::new()
            }
        }
    }

    /// Persists the profile with a fresh timestamp. IO failures are
    /// logged, not fatal.
    pub fn save(&self, profile: &UserProfile) {
        let document = ProfileDocument {
            timestamp: Local::now().to_rfc3339(),
            profile: profile.clone(),
        };

        let json = match serde_json::to_string_pretty(&document) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "could not serialize profile");
                return;
            }
        };

        if let Err(e) = std::fs::write(&self.path, json) {
            warn!(path = %self.path.display(), error = %e, "could not save profile");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ProfileStorage::new(dir.path().join("memory.json"));
        assert!(storage.load().is_empty());
    }

    #[test]
    fn malformed_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.json");
        std::fs::write(&path, "{ broken").unwrap();

        let storage = ProfileStorage::new(&path);
        assert!(storage.load().is_empty());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ProfileStorage::new(dir.path().join("memory.json"));

        let mut profile = UserProfile::new();
        profile.merge([
            ("name".to_string(), "Alice".to_string()),
            ("city".to_string(), "Paris".to_string()),
        ]);
        storage.save(&profile);

        let loaded = storage.load();
        assert_eq!(loaded, profile);
    }

    #[test]
    fn saved_document_carries_a_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.json");
        let storage = ProfileStorage::new(&path);
        storage.save(&UserProfile::new());

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw["timestamp"].as_str().is_some_and(|t| !t.is_empty()));
        assert!(raw["profile"].is_object());
    }

    #[test]
    fn save_failure_leaves_profile_intact() {
        // Saving into a directory that does not exist cannot succeed,
        // but must not panic either.
        let storage = ProfileStorage::new("/nonexistent-dir/deeper/memory.json");
        let mut profile = UserProfile::new();
        profile.merge([("name".to_string(), "Bob".to_string())]);
        storage.save(&profile);
        assert_eq!(profile.get("name"), Some("Bob"));
    }
}
