//! User preference persistence
//!
//! A small key/value file read once at startup and written on every change.
//! Boolean values are string-encoded ("true"/"false") to stay compatible
//! with the key/value store the presentation layer used historically.
//!
//! Read failures fall back to defaults -- preferences must never block
//! startup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use sqlprof_core::prelude::*;

const PREFS_FILENAME: &str = "preferences.toml";

/// Persisted view preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserPreferences {
    /// Keep the feed scrolled to the newest event.
    #[serde(
        rename = "auto-scroll-enabled",
        with = "bool_string",
        default = "default_true"
    )]
    pub auto_scroll_enabled: bool,

    /// Collapse adjacent events with identical batch text.
    #[serde(
        rename = "deduplicate-repeats-enabled",
        with = "bool_string",
        default = "default_false"
    )]
    pub deduplicate_repeats_enabled: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            auto_scroll_enabled: true,
            deduplicate_repeats_enabled: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

/// String-encoded booleans: "true"/"false" on the wire.
mod bool_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "true" } else { "false" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw == "true")
    }
}

/// Platform config directory for sqlprof.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sqlprof")
}

/// Load preferences, falling back to defaults on any failure.
pub fn load_preferences(config_dir: &Path) -> UserPreferences {
    let path = config_dir.join(PREFS_FILENAME);
    if !path.exists() {
        debug!("no preferences file at {:?}", path);
        return UserPreferences::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(prefs) => prefs,
            Err(e) => {
                warn!("failed to parse {:?}: {}", path, e);
                UserPreferences::default()
            }
        },
        Err(e) => {
            warn!("failed to read {:?}: {}", path, e);
            UserPreferences::default()
        }
    }
}

/// Save preferences with an atomic write (temp file + rename).
pub fn save_preferences(config_dir: &Path, prefs: &UserPreferences) -> Result<()> {
    if !config_dir.exists() {
        std::fs::create_dir_all(config_dir)
            .map_err(|e| Error::config(format!("failed to create config dir: {e}")))?;
    }

    let path = config_dir.join(PREFS_FILENAME);
    let temp_path = config_dir.join(".preferences.toml.tmp");

    let content = toml::to_string_pretty(prefs)
        .map_err(|e| Error::config(format!("failed to serialize preferences: {e}")))?;

    std::fs::write(&temp_path, content)
        .map_err(|e| Error::config(format!("failed to write temp file: {e}")))?;
    std::fs::rename(&temp_path, &path)
        .map_err(|e| Error::config(format!("failed to rename temp file: {e}")))?;

    debug!("saved preferences to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = UserPreferences::default();
        assert!(prefs.auto_scroll_enabled);
        assert!(!prefs.deduplicate_repeats_enabled);
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = UserPreferences {
            auto_scroll_enabled: false,
            deduplicate_repeats_enabled: true,
        };
        save_preferences(dir.path(), &prefs).unwrap();
        assert_eq!(load_preferences(dir.path()), prefs);
    }

    #[test]
    fn test_booleans_are_string_encoded_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        save_preferences(dir.path(), &UserPreferences::default()).unwrap();

        let raw = std::fs::read_to_string(dir.path().join(PREFS_FILENAME)).unwrap();
        assert!(raw.contains(r#""true""#));
        assert!(raw.contains("auto-scroll-enabled"));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_preferences(dir.path()), UserPreferences::default());
    }

    #[test]
    fn test_corrupt_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PREFS_FILENAME), "auto-scroll-enabled = [").unwrap();
        assert_eq!(load_preferences(dir.path()), UserPreferences::default());
    }

    #[test]
    fn test_partial_file_uses_field_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(PREFS_FILENAME),
            "deduplicate-repeats-enabled = \"true\"\n",
        )
        .unwrap();

        let prefs = load_preferences(dir.path());
        assert!(prefs.auto_scroll_enabled);
        assert!(prefs.deduplicate_repeats_enabled);
    }
}
