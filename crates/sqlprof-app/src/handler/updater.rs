//! Update-check lifecycle
//!
//! Single-flight: only one check may be in flight at a time, and no new
//! check starts while an install is running. Message visibility depends
//! on who initiated the check -- manual checks always answer the user,
//! automatic checks stay quiet unless there is something actionable.

use sqlprof_backend::{CommandResult, PendingUpdate};
use sqlprof_core::prelude::*;

use crate::state::{AppState, Tone, UpdatePhase};

use super::{UpdateAction, UpdateResult};

/// Why an update check failed, derived from the raw error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckFailure {
    /// No update endpoints are configured. A packaging/config problem,
    /// not something the user can fix at runtime.
    NoEndpoints,
    /// The signature key is missing or invalid. Also a config problem.
    BadSignature,
    /// The endpoints answered but no release exists yet.
    NoReleases,
    /// Anything else (network, server errors, ...).
    Other,
}

impl CheckFailure {
    /// The updater surfaces errors as strings; classification is by
    /// substring since there is no structured error to match on.
    fn classify(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if lower.contains("endpoint") {
            CheckFailure::NoEndpoints
        } else if lower.contains("signature")
            || lower.contains("public key")
            || lower.contains("pubkey")
        {
            CheckFailure::BadSignature
        } else if lower.contains("release") || lower.contains("not found") {
            CheckFailure::NoReleases
        } else {
            CheckFailure::Other
        }
    }

    fn is_config_issue(self) -> bool {
        matches!(self, CheckFailure::NoEndpoints | CheckFailure::BadSignature)
    }
}

/// Start a check unless one is already running or an install is active.
pub(crate) fn handle_check_for_updates(state: &mut AppState, manual: bool) -> UpdateResult {
    match state.update.phase {
        UpdatePhase::Checking { .. } => {
            debug!("update check ignored: one already in flight");
            return UpdateResult::none();
        }
        UpdatePhase::Installing => {
            debug!("update check ignored: install in progress");
            return UpdateResult::none();
        }
        _ => {}
    }

    state.update.phase = UpdatePhase::Checking { manual };
    if manual {
        state.update.set_message("Checking for updates...", Tone::Info);
    }
    UpdateResult::action(UpdateAction::CheckForUpdates { manual })
}

pub(crate) fn handle_check_completed(
    state: &mut AppState,
    manual: bool,
    result: std::result::Result<Option<PendingUpdate>, String>,
) -> UpdateResult {
    if !matches!(state.update.phase, UpdatePhase::Checking { .. }) {
        debug!("stale update-check completion ignored");
        return UpdateResult::none();
    }

    match result {
        Ok(Some(update)) => {
            info!(
                "update {} available (running {})",
                update.version, update.current_version
            );
            state
                .update
                .set_message(format!("Update {} available", update.version), Tone::Info);
            state.update.phase = UpdatePhase::Offered(update);
        }
        Ok(None) => {
            state.update.phase = UpdatePhase::Idle;
            if manual {
                state.update.set_message("You're up to date.", Tone::Success);
            } else {
                state.update.clear_message();
            }
        }
        Err(raw) => {
            state.update.phase = UpdatePhase::Idle;
            let failure = CheckFailure::classify(&raw);
            match failure {
                CheckFailure::NoReleases => {
                    // Benign on a fresh deployment; always shown so the
                    // user knows the checker did run.
                    state
                        .update
                        .set_message("No updates have been published yet.", Tone::Info);
                }
                _ if failure.is_config_issue() => {
                    warn!("update check failed (config): {raw}");
                    if manual {
                        let text = match failure {
                            CheckFailure::NoEndpoints => {
                                "Updater is not configured (no update endpoints set)."
                            }
                            _ => "Updater is misconfigured (invalid update signature key).",
                        };
                        state.update.set_message(text, Tone::Error);
                    } else {
                        state.update.clear_message();
                    }
                }
                _ => {
                    warn!("update check failed: {raw}");
                    if manual {
                        state
                            .update
                            .set_message(format!("Update check failed: {raw}"), Tone::Error);
                    } else {
                        state.update.clear_message();
                    }
                }
            }
        }
    }
    UpdateResult::none()
}

/// User accepted the offered update.
pub(crate) fn handle_confirm_install(state: &mut AppState) -> UpdateResult {
    let Some(update) = state.update.offered() else {
        debug!("install confirmed with no update offered");
        return UpdateResult::none();
    };
    info!("installing update {}", update.version);

    state.update.phase = UpdatePhase::Installing;
    state.update.set_message("Downloading update...", Tone::Info);
    UpdateResult::action(UpdateAction::DownloadAndInstall)
}

/// User declined. The availability message stays so the decision can be
/// revisited from the menu.
pub(crate) fn handle_decline_install(state: &mut AppState) -> UpdateResult {
    if state.update.offered().is_some() {
        state.update.phase = UpdatePhase::Idle;
    }
    UpdateResult::none()
}

pub(crate) fn handle_install_completed(state: &mut AppState, result: CommandResult) -> UpdateResult {
    match result {
        Ok(()) => {
            state.update.phase = UpdatePhase::Installed;
            state.update.set_message("Restarting...", Tone::Info);
            UpdateResult::action(UpdateAction::Relaunch)
        }
        Err(error) => {
            warn!("update install failed: {error}");
            state.update.phase = UpdatePhase::Idle;
            state
                .update
                .set_message(format!("Update failed: {error}"), Tone::Error);
            UpdateResult::none()
        }
    }
}

/// Install succeeded but the automatic restart did not. The update is on
/// disk; the user just has to restart themselves.
pub(crate) fn handle_relaunch_failed(state: &mut AppState, error: String) -> UpdateResult {
    warn!("relaunch failed: {error}");
    state.update.phase = UpdatePhase::Installed;
    state
        .update
        .set_message("Update installed. Please restart manually.", Tone::Info);
    UpdateResult::none()
}

pub(crate) fn handle_dismiss_message(state: &mut AppState) -> UpdateResult {
    state.update.clear_message();
    if matches!(
        state.update.phase,
        UpdatePhase::Offered(_) | UpdatePhase::Installed
    ) {
        state.update.phase = UpdatePhase::Idle;
    }
    UpdateResult::none()
}
