//! Message types for the application (TEA pattern)

use sqlprof_core::{BackendEvent, ConnectionConfig};

use sqlprof_backend::{CommandResult, PendingUpdate, SavedConnection};

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Push event from the capture backend (telemetry or status snapshot)
    Backend(BackendEvent),

    // ─────────────────────────────────────────────────────────
    // Session Commands (UI-originated)
    // ─────────────────────────────────────────────────────────
    /// Begin a connection attempt
    Connect {
        config: Box<ConnectionConfig>,
        remember_password: bool,
    },
    /// End the current connection
    Disconnect,
    /// Start telemetry capture
    StartCapture,
    /// Stop telemetry capture
    StopCapture,

    // ─────────────────────────────────────────────────────────
    // Session Command Completions (from engine tasks)
    // ─────────────────────────────────────────────────────────
    ConnectCompleted {
        result: CommandResult,
        /// Non-secret parameters to persist on success.
        saved: SavedConnection,
    },
    DisconnectCompleted { result: CommandResult },
    StartCaptureCompleted { result: CommandResult },
    StopCaptureCompleted { result: CommandResult },

    // ─────────────────────────────────────────────────────────
    // Feed/View Messages
    // ─────────────────────────────────────────────────────────
    /// Clear all captured events
    ClearEvents,
    /// Select an event by id (None clears the selection)
    SelectEvent { id: Option<String> },
    /// Update the substring filter
    SetFilter { text: String },
    /// Toggle adjacent-duplicate collapsing (persisted preference)
    SetDedup { enabled: bool },
    /// Toggle auto-scroll (persisted preference)
    SetAutoScroll { enabled: bool },
    /// Show/hide the connection-setup surface
    ToggleConnectionForm,

    // ─────────────────────────────────────────────────────────
    // Saved Connection
    // ─────────────────────────────────────────────────────────
    /// Request the previously saved connection parameters
    LoadSavedConnection,
    /// Saved connection loaded (None = nothing saved; never an error)
    SavedConnectionLoaded { saved: Option<SavedConnection> },

    // ─────────────────────────────────────────────────────────
    // Update Checker
    // ─────────────────────────────────────────────────────────
    /// Start an update check. Automatic checks are silent on benign
    /// failure; manual checks always produce a visible message.
    CheckForUpdates { manual: bool },
    /// Update check resolved
    UpdateCheckCompleted {
        manual: bool,
        result: Result<Option<PendingUpdate>, String>,
    },
    /// User confirmed installing the offered update
    ConfirmInstall,
    /// User declined the offered update
    DeclineInstall,
    /// Dismiss the current update message
    DismissUpdateMessage,
    /// Download+install resolved
    UpdateInstallCompleted { result: CommandResult },
    /// Install succeeded but the automatic restart did not
    UpdateRelaunchFailed { error: String },

    /// Stop the engine loop
    Shutdown,
}
