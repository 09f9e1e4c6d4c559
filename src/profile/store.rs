//! JSON-file key-value store holding the profile.
//!
//! The file is a single JSON object.  Two keys are meaningful:
//!
//! | Key                   | Value                                   |
//! |-----------------------|-----------------------------------------|
//! | `profile`             | `{name, nativeLanguage, aiProvider, apiKey}` |
//! | `conversationHistory` | reserved; removed together with `profile` |
//!
//! Every write replaces the whole file through a temporary file and a
//! rename, so readers never observe a half-written record.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::{Profile, ProfileError};

/// Store key for the user profile.
pub const PROFILE_KEY: &str = "profile";
/// Store key for saved conversation history.
pub const HISTORY_KEY: &str = "conversationHistory";

/// File-backed store for the single [`Profile`] record.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    /// Store backed by `path`.  The file is created on first save.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved profile.
    ///
    /// Returns `None` when no profile has been saved.  A stored entry that
    /// cannot be parsed, or that is incomplete, is removed and treated as
    /// first run.
    pub fn load_profile(&self) -> Option<Profile> {
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(e) => {
                log::warn!("Profile store unreadable ({e}); treating as first run");
                return None;
            }
        };

        let value = map.get(PROFILE_KEY)?.clone();
        match serde_json::from_value::<Profile>(value) {
            Ok(profile) if profile.is_complete() => Some(profile),
            Ok(_) | Err(_) => {
                log::warn!("Stored profile is invalid; discarding it");
                map.remove(PROFILE_KEY);
                if let Err(e) = self.write_map(&map) {
                    log::warn!("Failed to discard invalid profile: {e}");
                }
                None
            }
        }
    }

    /// Persist `profile`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// [`ProfileError::Incomplete`] / [`ProfileError::InvalidProvider`] when
    /// the profile is not fully populated (nothing is written), or an I/O
    /// error from the write.
    pub fn save_profile(&self, profile: &Profile) -> Result<(), ProfileError> {
        profile.validate()?;

        let mut map = self.read_map().unwrap_or_else(|e| {
            log::warn!("Profile store unreadable ({e}); rewriting it");
            Map::new()
        });
        map.insert(PROFILE_KEY.to_string(), serde_json::to_value(profile)?);
        self.write_map(&map)
    }

    /// Remove the profile and any stored conversation history.
    pub fn delete_all(&self) -> Result<(), ProfileError> {
        let mut map = self.read_map().unwrap_or_default();
        map.remove(PROFILE_KEY);
        map.remove(HISTORY_KEY);
        self.write_map(&map)
    }

    #[cfg(test)]
    pub(crate) fn get(&self, key: &str) -> Option<Value> {
        self.read_map().ok()?.remove(key)
    }

    #[cfg(test)]
    pub(crate) fn put(&self, key: &str, value: Value) -> Result<(), ProfileError> {
        let mut map = self.read_map().unwrap_or_default();
        map.insert(key.to_string(), value);
        self.write_map(&map)
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    fn read_map(&self) -> Result<Map<String, Value>, ProfileError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<(), ProfileError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(map)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Provider;
    use tempfile::tempdir;

    fn sample() -> Profile {
        Profile {
            name: "Arjun".into(),
            native_language: "Hindi".into(),
            ai_provider: Provider::Gemini,
            api_key: "AIza-test".into(),
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().expect("temp dir");
        let store = ProfileStore::open(dir.path().join("store.json"));

        store.save_profile(&sample()).expect("save");
        assert_eq!(store.load_profile(), Some(sample()));
    }

    #[test]
    fn missing_file_means_no_profile() {
        let dir = tempdir().expect("temp dir");
        let store = ProfileStore::open(dir.path().join("absent.json"));
        assert!(store.load_profile().is_none());
    }

    #[test]
    fn delete_then_load_is_absent() {
        let dir = tempdir().expect("temp dir");
        let store = ProfileStore::open(dir.path().join("store.json"));

        store.save_profile(&sample()).expect("save");
        store
            .put(HISTORY_KEY, serde_json::json!([{"role": "user", "content": "hi"}]))
            .expect("put history");

        store.delete_all().expect("delete");
        assert!(store.load_profile().is_none());
        assert!(store.get(HISTORY_KEY).is_none());
    }

    #[test]
    fn partial_profile_is_never_written() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("store.json");
        let store = ProfileStore::open(&path);

        let mut partial = sample();
        partial.api_key.clear();

        assert!(matches!(
            store.save_profile(&partial),
            Err(ProfileError::Incomplete("apiKey"))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_file_falls_back_to_first_run() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{not json").expect("write");

        let store = ProfileStore::open(&path);
        assert!(store.load_profile().is_none());

        // A later save replaces the corrupt file.
        store.save_profile(&sample()).expect("save");
        assert_eq!(store.load_profile(), Some(sample()));
    }

    #[test]
    fn malformed_profile_entry_is_discarded() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("store.json");
        std::fs::write(&path, r#"{"profile": {"name": 42}}"#).expect("write");

        let store = ProfileStore::open(&path);
        assert!(store.load_profile().is_none());
        assert!(store.get(PROFILE_KEY).is_none());
    }

    #[test]
    fn resave_replaces_every_field() {
        let dir = tempdir().expect("temp dir");
        let store = ProfileStore::open(dir.path().join("store.json"));
        store.save_profile(&sample()).expect("save");

        let edited = Profile {
            name: "Arjun K".into(),
            native_language: "Telugu".into(),
            ai_provider: Provider::Groq,
            api_key: "gsk_new".into(),
        };
        store.save_profile(&edited).expect("resave");
        assert_eq!(store.load_profile(), Some(edited));
    }

    #[test]
    fn no_temporary_file_left_behind() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("store.json");
        let store = ProfileStore::open(&path);
        store.save_profile(&sample()).expect("save");

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }
}
