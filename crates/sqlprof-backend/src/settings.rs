//! Saved-connection persistence
//!
//! Stores the non-secret subset of the last successful connection so the
//! connection form can be pre-filled on the next launch. The password is
//! deliberately absent: credential storage belongs to an external keychain
//! collaborator which honors the `remember_password` flag recorded here.
//!
//! Read failures of any kind mean "no saved connection" -- a missing or
//! corrupt file must never block startup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use sqlprof_core::prelude::*;
use sqlprof_core::{Authentication, ConnectionConfig, Encryption};

const SETTINGS_FILE: &str = "connection.json";

/// Non-secret connection parameters persisted between runs.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SavedConnection {
    pub server_name: String,
    pub authentication: Authentication,
    pub username: String,
    pub database: String,
    pub encrypt: Encryption,
    pub trust_cert: bool,
    pub remember_password: bool,
}

impl SavedConnection {
    /// Strip the secret fields from a connect request.
    pub fn from_config(config: &ConnectionConfig, remember_password: bool) -> Self {
        Self {
            server_name: config.server_name.clone(),
            authentication: config.authentication,
            username: config.username.clone(),
            database: config.database.clone(),
            encrypt: config.encrypt,
            trust_cert: config.trust_cert,
            remember_password,
        }
    }
}

/// Platform config directory for sqlprof.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sqlprof")
}

/// Load the saved connection, if any.
///
/// Returns `None` on a missing, unreadable, or unparsable file.
pub fn load_connection(config_dir: &Path) -> Option<SavedConnection> {
    let path = config_dir.join(SETTINGS_FILE);
    if !path.exists() {
        debug!("no saved connection at {:?}", path);
        return None;
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(saved) => Some(saved),
            Err(e) => {
                warn!("failed to parse {:?}: {}", path, e);
                None
            }
        },
        Err(e) => {
            warn!("failed to read {:?}: {}", path, e);
            None
        }
    }
}

/// Save the connection parameters.
///
/// Uses atomic write (temp file + rename) so a crash mid-write cannot leave
/// a truncated settings file behind.
pub fn save_connection(config_dir: &Path, saved: &SavedConnection) -> Result<()> {
    if !config_dir.exists() {
        std::fs::create_dir_all(config_dir)
            .map_err(|e| Error::config(format!("failed to create config dir: {e}")))?;
    }

    let path = config_dir.join(SETTINGS_FILE);
    let temp_path = config_dir.join(".connection.json.tmp");

    let content = serde_json::to_string_pretty(saved)
        .map_err(|e| Error::config(format!("failed to serialize connection: {e}")))?;

    std::fs::write(&temp_path, content)
        .map_err(|e| Error::config(format!("failed to write temp file: {e}")))?;
    std::fs::rename(&temp_path, &path)
        .map_err(|e| Error::config(format!("failed to rename temp file: {e}")))?;

    debug!("saved connection to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SavedConnection {
        SavedConnection {
            server_name: "localhost\\SQLEXPRESS".to_string(),
            authentication: Authentication::Sql,
            username: "sa".to_string(),
            database: "Northwind".to_string(),
            encrypt: Encryption::Optional,
            trust_cert: true,
            remember_password: false,
        }
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        save_connection(dir.path(), &sample()).unwrap();

        let loaded = load_connection(dir.path()).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_connection(dir.path()).is_none());
    }

    #[test]
    fn test_corrupt_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "{ not json").unwrap();
        assert!(load_connection(dir.path()).is_none());
    }

    #[test]
    fn test_save_creates_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        save_connection(&nested, &sample()).unwrap();
        assert!(load_connection(&nested).is_some());
    }

    #[test]
    fn test_from_config_drops_password() {
        let config: ConnectionConfig = serde_json::from_str(
            r#"{
                "server_name": "localhost",
                "authentication": "windows",
                "username": "",
                "password": "hunter2",
                "database": "",
                "encrypt": "strict",
                "trust_cert": false
            }"#,
        )
        .unwrap();

        let saved = SavedConnection::from_config(&config, true);
        assert!(saved.remember_password);
        let json = serde_json::to_string(&saved).unwrap();
        assert!(!json.contains("hunter2"));
    }
}
