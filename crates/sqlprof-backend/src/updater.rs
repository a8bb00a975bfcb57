//! Update-source boundary
//!
//! The update checker drives this trait; the concrete implementation wraps
//! whatever release channel the deployment uses. Errors cross the boundary
//! as the backend's raw message text so the checker's classifier can map
//! them to user-facing messages.

use serde::{Deserialize, Serialize};

/// A newer build offered by the update source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PendingUpdate {
    /// Version offered for install.
    pub version: String,
    /// Version currently running.
    pub current_version: String,
}

/// Boundary to the release channel.
///
/// `check` resolves to `Ok(None)` when the running build is current. The
/// download/install/relaunch sequence is strictly sequential per
/// invocation; the checker's single-flight guard prevents overlap.
#[trait_variant::make(UpdateSource: Send)]
pub trait LocalUpdateSource {
    /// Query the release channel for a newer build.
    async fn check(&self) -> Result<Option<PendingUpdate>, String>;

    /// Download and install the update found by the last `check`.
    async fn download_and_install(&self) -> Result<(), String>;

    /// Restart into the newly installed build. On success this call does
    /// not return in a real deployment; an `Err` means the install is in
    /// place but the restart must be done by hand.
    async fn relaunch(&self) -> Result<(), String>;
}
