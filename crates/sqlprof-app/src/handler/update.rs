//! Main update function (TEA pattern)
//!
//! Pure with respect to the outside world: mutates [`AppState`] and
//! returns the side effects as an [`UpdateResult`] for the engine to
//! execute. Never blocks, never touches I/O.

use sqlprof_core::prelude::*;
use sqlprof_core::BackendEvent;

use crate::message::Message;
use crate::state::AppState;

use super::{session, updater, UpdateAction, UpdateResult};

/// Process a message and update state accordingly.
pub fn update(state: &mut AppState, msg: Message) -> UpdateResult {
    match msg {
        Message::Backend(event) => handle_backend_event(state, event),

        // ─────────────────────────────────────────────────────────
        // Session
        // ─────────────────────────────────────────────────────────
        Message::Connect {
            config,
            remember_password,
        } => session::handle_connect(state, config, remember_password),
        Message::Disconnect => session::handle_disconnect(state),
        Message::StartCapture => session::handle_start_capture(state),
        Message::StopCapture => session::handle_stop_capture(state),

        Message::ConnectCompleted { result, saved } => {
            session::handle_connect_completed(state, result, saved)
        }
        Message::DisconnectCompleted { result } => {
            session::handle_disconnect_completed(state, result)
        }
        Message::StartCaptureCompleted { result } => {
            session::handle_start_capture_completed(state, result)
        }
        Message::StopCaptureCompleted { result } => {
            session::handle_stop_capture_completed(state, result)
        }

        // ─────────────────────────────────────────────────────────
        // Feed / view
        // ─────────────────────────────────────────────────────────
        Message::ClearEvents => {
            state.feed.clear();
            state.selected_id = None;
            UpdateResult::none()
        }
        Message::SelectEvent { id } => {
            state.selected_id = id;
            UpdateResult::none()
        }
        Message::SetFilter { text } => {
            state.filter = text;
            UpdateResult::none()
        }
        Message::SetDedup { enabled } => {
            state.prefs.deduplicate_repeats_enabled = enabled;
            UpdateResult::action(UpdateAction::SavePreferences { prefs: state.prefs })
        }
        Message::SetAutoScroll { enabled } => {
            state.prefs.auto_scroll_enabled = enabled;
            UpdateResult::action(UpdateAction::SavePreferences { prefs: state.prefs })
        }
        Message::ToggleConnectionForm => session::handle_toggle_connection_form(state),

        // ─────────────────────────────────────────────────────────
        // Saved connection
        // ─────────────────────────────────────────────────────────
        Message::LoadSavedConnection => UpdateResult::action(UpdateAction::LoadSavedConnection),
        Message::SavedConnectionLoaded { saved } => {
            session::handle_saved_connection_loaded(state, saved)
        }

        // ─────────────────────────────────────────────────────────
        // Update checker
        // ─────────────────────────────────────────────────────────
        Message::CheckForUpdates { manual } => updater::handle_check_for_updates(state, manual),
        Message::UpdateCheckCompleted { manual, result } => {
            updater::handle_check_completed(state, manual, result)
        }
        Message::ConfirmInstall => updater::handle_confirm_install(state),
        Message::DeclineInstall => updater::handle_decline_install(state),
        Message::DismissUpdateMessage => updater::handle_dismiss_message(state),
        Message::UpdateInstallCompleted { result } => {
            updater::handle_install_completed(state, result)
        }
        Message::UpdateRelaunchFailed { error } => updater::handle_relaunch_failed(state, error),

        // Handled by the engine loop itself.
        Message::Shutdown => UpdateResult::none(),
    }
}

/// Route a push from the capture backend.
fn handle_backend_event(state: &mut AppState, event: BackendEvent) -> UpdateResult {
    match event {
        BackendEvent::Query(query) => {
            state.feed.upsert(query);
            UpdateResult::none()
        }
        BackendEvent::Status(status) => session::handle_status_push(state, status),
        BackendEvent::Unknown { event, .. } => {
            debug!("ignoring unknown backend event {event:?}");
            UpdateResult::none()
        }
    }
}
