//! Connection/capture state machine
//!
//! Reconciles externally pushed status snapshots with locally issued
//! commands. The backend owns the truth about the server session;
//! this machine owns the local [`ProfilerStatus`] and decides the side
//! effects (auto-stop repair, surfacing errors, re-arming the connection
//! form).

use sqlprof_core::prelude::*;
use sqlprof_core::{ConnectionConfig, ProfilerStatus};

use sqlprof_backend::{CommandResult, SavedConnection};

use crate::state::AppState;

use super::{UpdateAction, UpdateResult};

/// Begin a connection attempt.
pub(crate) fn handle_connect(
    state: &mut AppState,
    config: Box<ConnectionConfig>,
    remember_password: bool,
) -> UpdateResult {
    if state.connecting {
        debug!("connect ignored: request already in flight");
        return UpdateResult::none();
    }
    state.connecting = true;
    state.status.error = None;
    UpdateResult::action(UpdateAction::Connect {
        config,
        remember_password,
    })
}

/// Connect request resolved. Success is only provisional here: the
/// authoritative `connected=true` arrives as a status push.
pub(crate) fn handle_connect_completed(
    state: &mut AppState,
    result: CommandResult,
    saved: SavedConnection,
) -> UpdateResult {
    state.connecting = false;
    match result {
        Ok(()) => UpdateResult::action(UpdateAction::SaveConnection { saved }),
        Err(error) => {
            warn!("connect failed: {error}");
            state.status.error = Some(error);
            UpdateResult::none()
        }
    }
}

/// End the current connection.
///
/// Local state resets immediately and unconditionally: a disconnect must
/// never leave stale "connected" state behind, even if the request itself
/// errors later.
pub(crate) fn handle_disconnect(state: &mut AppState) -> UpdateResult {
    state.status = ProfilerStatus::disconnected();
    state.connecting = false;
    state.show_connection = true;
    UpdateResult::action(UpdateAction::Disconnect)
}

pub(crate) fn handle_disconnect_completed(
    state: &mut AppState,
    result: CommandResult,
) -> UpdateResult {
    if let Err(error) = result {
        // State was already reset optimistically; only record the error.
        warn!("disconnect failed: {error}");
        state.status.error = Some(error);
    }
    UpdateResult::none()
}

pub(crate) fn handle_start_capture(_state: &mut AppState) -> UpdateResult {
    UpdateResult::action(UpdateAction::StartCapture)
}

/// A capture failure is treated as connection-worthy: the most common
/// cause is a stale or broken session, so the connection surface is
/// forced back open.
pub(crate) fn handle_start_capture_completed(
    state: &mut AppState,
    result: CommandResult,
) -> UpdateResult {
    if let Err(error) = result {
        warn!("start-capture failed: {error}");
        state.status.error = Some(error);
        state.show_connection = true;
    }
    UpdateResult::none()
}

pub(crate) fn handle_stop_capture(_state: &mut AppState) -> UpdateResult {
    UpdateResult::action(UpdateAction::StopCapture)
}

pub(crate) fn handle_stop_capture_completed(
    state: &mut AppState,
    result: CommandResult,
) -> UpdateResult {
    if let Err(error) = result {
        warn!("stop-capture failed: {error}");
        state.status.error = Some(error);
    }
    UpdateResult::none()
}

/// Reconcile an out-of-band status push.
///
/// The snapshot fully replaces the local flags. Repair rule: a backend
/// reporting `connected=false` while still `capturing=true` is in an
/// inconsistent state; the client issues a stop-capture itself instead of
/// merely displaying the inconsistency.
pub(crate) fn handle_status_push(state: &mut AppState, push: ProfilerStatus) -> UpdateResult {
    let needs_repair = !push.connected && push.capturing;

    state.status = push;
    if state.status.connected {
        state.connecting = false;
        state.show_connection = false;
    }

    if needs_repair {
        info!("status push reports disconnected while capturing; issuing stop-capture repair");
        return UpdateResult::action(UpdateAction::StopCapture);
    }
    UpdateResult::none()
}

/// Toggle the connection-setup surface. Closing is only allowed while
/// connected; while disconnected the form is the only way back.
pub(crate) fn handle_toggle_connection_form(state: &mut AppState) -> UpdateResult {
    if state.show_connection && !state.status.connected {
        return UpdateResult::none();
    }
    state.show_connection = !state.show_connection;
    UpdateResult::none()
}

/// Saved connection read from disk (or nothing -- never an error).
pub(crate) fn handle_saved_connection_loaded(
    state: &mut AppState,
    saved: Option<SavedConnection>,
) -> UpdateResult {
    state.saved_connection = saved;
    UpdateResult::none()
}
