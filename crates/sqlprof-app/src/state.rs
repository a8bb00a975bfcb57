//! Application state (Model in TEA pattern)

use sqlprof_core::{ProfilerStatus, QueryEvent};

use sqlprof_backend::{PendingUpdate, SavedConnection};

use crate::config::UserPreferences;
use crate::feed::{project, EventFeed};

/// Session lifecycle, derived from the owned [`ProfilerStatus`] plus the
/// in-flight connect flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Disconnected,
    Connecting,
    ConnectedIdle,
    Capturing,
}

/// Severity of an update-checker message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Info,
    Success,
    Error,
}

/// Internal phase of the update checker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UpdatePhase {
    #[default]
    Idle,

    /// A check is in flight. `manual` decides message visibility on
    /// resolution; further check requests are ignored until then.
    Checking { manual: bool },

    /// A newer build was found; waiting for the user's decision.
    Offered(PendingUpdate),

    /// Download and install in progress.
    Installing,

    /// Installed; restart pending or left to the user.
    Installed,
}

/// Update checker state: phase plus the message shown to the user.
#[derive(Debug, Clone, Default)]
pub struct UpdateState {
    pub phase: UpdatePhase,
    pub message: Option<String>,
    pub tone: Tone,
}

impl UpdateState {
    pub(crate) fn set_message(&mut self, text: impl Into<String>, tone: Tone) {
        self.message = Some(text.into());
        self.tone = tone;
    }

    pub(crate) fn clear_message(&mut self) {
        self.message = None;
        self.tone = Tone::Info;
    }

    /// The pending update currently offered, if any.
    pub fn offered(&self) -> Option<&PendingUpdate> {
        match &self.phase {
            UpdatePhase::Offered(update) => Some(update),
            _ => None,
        }
    }
}

/// Read model of the update checker for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatus {
    pub checking: bool,
    pub message: Option<String>,
    pub tone: Tone,
}

/// Complete application state (the Model in TEA)
#[derive(Debug, Default)]
pub struct AppState {
    /// Connection/capture snapshot. Owned here; the backend pushes
    /// replacements and everything else only reads it.
    pub status: ProfilerStatus,

    /// A connect request is in flight.
    pub connecting: bool,

    /// Ordered event store.
    pub feed: EventFeed,

    /// Case-insensitive substring filter over the feed.
    pub filter: String,

    /// Currently selected event id. Cleared together with the feed.
    pub selected_id: Option<String>,

    /// Whether the connection-setup surface is shown. Starts open.
    pub show_connection: bool,

    /// Pre-fill data for the connection form, loaded at startup.
    pub saved_connection: Option<SavedConnection>,

    /// Persisted view preferences.
    pub prefs: UserPreferences,

    /// Update checker state.
    pub update: UpdateState,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            show_connection: true,
            ..Self::default()
        }
    }

    /// Create with preferences loaded at startup.
    pub fn with_preferences(prefs: UserPreferences) -> Self {
        Self {
            prefs,
            ..Self::new()
        }
    }

    /// Current session phase.
    pub fn phase(&self) -> SessionPhase {
        if self.status.connected {
            if self.status.capturing {
                SessionPhase::Capturing
            } else {
                SessionPhase::ConnectedIdle
            }
        } else if self.connecting {
            SessionPhase::Connecting
        } else {
            SessionPhase::Disconnected
        }
    }

    /// Filtered, optionally deduplicated view of the feed, derived fresh
    /// on every call.
    pub fn visible_events(&self) -> Vec<&QueryEvent> {
        project(
            self.feed.events(),
            &self.filter,
            self.prefs.deduplicate_repeats_enabled,
        )
    }

    /// The selected event, if it still exists in the store.
    pub fn selected_event(&self) -> Option<&QueryEvent> {
        self.selected_id.as_deref().and_then(|id| self.feed.get(id))
    }

    /// Error shown on the connection-setup surface. Only meaningful while
    /// disconnected; once connected the slot carries capture errors.
    pub fn connection_error(&self) -> Option<&str> {
        if self.status.connected {
            None
        } else {
            self.status.error.as_deref()
        }
    }

    /// Error shown in the capture toolbar/status bar while connected.
    pub fn capture_error(&self) -> Option<&str> {
        if self.status.connected {
            self.status.error.as_deref()
        } else {
            None
        }
    }

    /// Read model of the update checker.
    pub fn update_status(&self) -> UpdateStatus {
        UpdateStatus {
            checking: matches!(self.update.phase, UpdatePhase::Checking { .. }),
            message: self.update.message.clone(),
            tone: self.update.tone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_shows_connection_form() {
        let state = AppState::new();
        assert!(state.show_connection);
        assert_eq!(state.phase(), SessionPhase::Disconnected);
        assert!(state.feed.is_empty());
    }

    #[test]
    fn test_phase_derivation() {
        let mut state = AppState::new();
        assert_eq!(state.phase(), SessionPhase::Disconnected);

        state.connecting = true;
        assert_eq!(state.phase(), SessionPhase::Connecting);

        state.connecting = false;
        state.status.connected = true;
        assert_eq!(state.phase(), SessionPhase::ConnectedIdle);

        state.status.capturing = true;
        assert_eq!(state.phase(), SessionPhase::Capturing);
    }

    #[test]
    fn test_error_slot_is_repurposed_by_connection_state() {
        let mut state = AppState::new();
        state.status.error = Some("boom".to_string());

        assert_eq!(state.connection_error(), Some("boom"));
        assert!(state.capture_error().is_none());

        state.status.connected = true;
        assert!(state.connection_error().is_none());
        assert_eq!(state.capture_error(), Some("boom"));
    }

    #[test]
    fn test_update_status_reflects_checking_phase() {
        let mut state = AppState::new();
        assert!(!state.update_status().checking);

        state.update.phase = UpdatePhase::Checking { manual: true };
        assert!(state.update_status().checking);
    }
}
