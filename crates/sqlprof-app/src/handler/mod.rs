//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `session`: Connection/capture state machine and status reconciliation
//! - `updater`: Update-check lifecycle and error classification

pub(crate) mod session;
pub(crate) mod update;
pub(crate) mod updater;


use sqlprof_core::ConnectionConfig;

use sqlprof_backend::SavedConnection;

use crate::config::UserPreferences;
use crate::message::Message;

// Re-export main entry point
pub use update::update;

/// Actions that the engine should perform after update
#[derive(Debug, Clone)]
pub enum UpdateAction {
    /// Issue a connect request to the backend
    Connect {
        config: Box<ConnectionConfig>,
        remember_password: bool,
    },

    /// Issue a disconnect request
    Disconnect,

    /// Issue a start-capture request
    StartCapture,

    /// Issue a stop-capture request
    StopCapture,

    /// Read the saved connection from disk
    LoadSavedConnection,

    /// Persist the non-secret connection parameters
    SaveConnection { saved: SavedConnection },

    /// Persist the view preferences
    SavePreferences { prefs: UserPreferences },

    /// Ask the update source for a newer build
    CheckForUpdates { manual: bool },

    /// Download and install the offered update
    DownloadAndInstall,

    /// Restart into the installed update
    Relaunch,
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the engine to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }
}
