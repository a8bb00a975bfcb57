//! sqlprof-app - State machines and reconciliation engine for sqlprof
//!
//! This crate implements the TEA (The Elm Architecture) pattern: all state
//! lives in [`AppState`], every input is a [`Message`], and the pure
//! [`handler::update`] function maps (state, message) to state changes plus
//! follow-up [`UpdateAction`]s. The async [`Engine`] owns the message queue
//! and executes actions against the backend command channel and the update
//! source.
//!
//! The presentation layer is an external collaborator: it reads the state
//! (session phase, projected event feed, update status) and injects
//! UI-originated messages through an [`EngineHandle`].

pub mod config;
pub mod engine;
pub mod feed;
pub mod handler;
pub mod message;
pub mod state;

// Re-export primary types
pub use engine::{Engine, EngineHandle};
pub use feed::{project, EventFeed};
pub use handler::{UpdateAction, UpdateResult};
pub use message::Message;
pub use state::{AppState, SessionPhase, Tone, UpdateStatus};

// Re-export backend boundary types for the presentation layer
pub use sqlprof_backend::{CommandSender, PendingUpdate, SavedConnection, UpdateSource};
