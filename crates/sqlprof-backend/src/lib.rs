//! sqlprof-backend - Capture-backend boundary for sqlprof
//!
//! The capture backend itself (the component that talks to the server and
//! produces telemetry) is an external collaborator. This crate owns the
//! typed boundary to it:
//!
//! - `commands`: request/response commands over an mpsc channel with
//!   oneshot replies, wrapped by [`CommandSender`]
//! - `settings`: saved-connection persistence (non-secret parameters only)
//! - `updater`: the [`UpdateSource`] trait the update checker drives
//! - `test_utils`: scripted doubles behind the `test-helpers` feature

pub mod commands;
pub mod settings;
pub mod updater;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use commands::{CommandResult, CommandSender, ProfilerCommand};
pub use settings::{default_config_dir, load_connection, save_connection, SavedConnection};
pub use updater::{PendingUpdate, UpdateSource};
