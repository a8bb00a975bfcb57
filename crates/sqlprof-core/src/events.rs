//! Push events from the capture backend
//!
//! The backend emits `(event, params)` pairs. Arrival order is preserved by
//! the engine but the set of event names is open-ended: unknown events are
//! carried through as [`BackendEvent::Unknown`] instead of being dropped,
//! so a newer backend never breaks an older client.

use crate::types::{ProfilerStatus, QueryEvent};

/// Event name for a telemetry record push.
pub const QUERY_EVENT: &str = "query-event";
/// Event name for a status snapshot push.
pub const PROFILER_STATUS: &str = "profiler-status";

/// Fully typed push event from the capture backend.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    /// One telemetry record; triggers an event-store upsert.
    Query(QueryEvent),

    /// One status snapshot; triggers session-machine reconciliation.
    Status(ProfilerStatus),

    /// Fallback for unrecognized or malformed events.
    Unknown {
        event: String,
        params: serde_json::Value,
    },
}

impl BackendEvent {
    /// Parse a named push event into its typed form.
    pub fn parse(event: &str, params: serde_json::Value) -> Self {
        match event {
            QUERY_EVENT => serde_json::from_value(params.clone())
                .map(BackendEvent::Query)
                .unwrap_or_else(|_| Self::unknown(event, params)),
            PROFILER_STATUS => serde_json::from_value(params.clone())
                .map(BackendEvent::Status)
                .unwrap_or_else(|_| Self::unknown(event, params)),
            _ => Self::unknown(event, params),
        }
    }

    fn unknown(event: &str, params: serde_json::Value) -> Self {
        BackendEvent::Unknown {
            event: event.to_string(),
            params,
        }
    }

    /// Get a human-readable summary for logging.
    pub fn summary(&self) -> String {
        match self {
            BackendEvent::Query(q) => {
                format!("query event {} (session {})", q.id, q.session_id)
            }
            BackendEvent::Status(s) => format!(
                "status push (connected={}, capturing={})",
                s.connected, s.capturing
            ),
            BackendEvent::Unknown { event, .. } => format!("unknown event: {event}"),
        }
    }
}
