//! # sqlprof-core - Core Domain Types
//!
//! Foundation crate for sqlprof. Provides the telemetry data model, the
//! backend push-event envelope, error handling, and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on
//! external crates (serde, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`QueryEvent`] - One observed query execution at a point in time
//! - [`EventStatus`] - Running vs. completed lifecycle of a query event
//! - [`ProfilerStatus`] - Connection/capture snapshot owned by the session machine
//! - [`ConnectionConfig`] - Transient connection parameters for a connect request
//!
//! ### Events (`events`)
//! - [`BackendEvent`] - Parsed push events from the capture backend
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Crate-wide error enum
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`

pub mod error;
pub mod events;
pub mod logging;
pub mod types;

/// Prelude for common imports used throughout all sqlprof crates
pub mod prelude {
    pub use super::error::{Error, Result};
    pub use tracing::{debug, error, info, trace, warn};
}

pub use error::{Error, Result};
pub use events::BackendEvent;
pub use types::{
    Authentication, ConnectionConfig, Encryption, EventStatus, ProfilerStatus, QueryEvent,
};
