//! Domain types for the query monitor

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a single query event.
///
/// An event may be reported first as `Running` and later updated in place
/// to `Completed` with final metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Running,
    Completed,
}

/// One observed query execution at a point in time.
///
/// `id` is the stable upsert key: exactly one `QueryEvent` exists per `id`
/// in the event store, and successive observations with the same `id`
/// replace the record in place. Metric fields are non-negative and
/// non-decreasing across updates while the event is still running.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryEvent {
    pub id: String,
    /// Server session id. Not unique across events -- many events share a session.
    pub session_id: i32,
    /// Server-reported start of the execution.
    pub start_time: DateTime<Utc>,
    /// Raw server-side request status text (e.g. "running", "suspended").
    pub status: String,
    /// Server-reported command type (e.g. "SELECT").
    pub command: String,
    pub database_name: String,
    #[serde(default)]
    pub wait_type: Option<String>,
    pub wait_time: u64,
    pub cpu_time: u64,
    pub elapsed_time: u64,
    pub reads: u64,
    pub writes: u64,
    pub logical_reads: u64,
    pub row_count: u64,
    /// Full batch text.
    pub sql_text: String,
    /// Statement currently executing within the batch; may be empty.
    pub current_statement: String,
    pub login_name: String,
    pub host_name: String,
    pub program_name: String,
    /// Local capture time, assigned by the backend when the row was read.
    pub captured_at: DateTime<Utc>,
    pub event_status: EventStatus,
}

impl QueryEvent {
    /// True once the backend has reported final metrics for this execution.
    pub fn is_completed(&self) -> bool {
        self.event_status == EventStatus::Completed
    }
}

/// Connection/capture snapshot.
///
/// Owned exclusively by the session state machine; the backend pushes
/// replacement snapshots and the presentation layer only reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProfilerStatus {
    pub connected: bool,
    pub capturing: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl ProfilerStatus {
    /// Snapshot for a clean disconnected session with no error.
    pub fn disconnected() -> Self {
        Self::default()
    }
}

/// Authentication mode for a connect request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Authentication {
    Sql,
    Windows,
}

/// TLS encryption mode for a connect request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Encryption {
    Optional,
    Mandatory,
    Strict,
}

/// Connection parameters for a connect request.
///
/// Transient input: the core never retains this beyond the duration of the
/// request. Persisting the non-secret subset is the backend settings
/// module's concern.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionConfig {
    pub server_name: String,
    pub authentication: Authentication,
    pub username: String,
    pub password: String,
    pub database: String,
    pub encrypt: Encryption,
    pub trust_cert: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event_json() -> &'static str {
        r#"{
            "id": "51-1724580000",
            "session_id": 51,
            "start_time": "2026-08-25T09:30:00Z",
            "status": "running",
            "command": "SELECT",
            "database_name": "Northwind",
            "wait_type": null,
            "wait_time": 0,
            "cpu_time": 12,
            "elapsed_time": 34,
            "reads": 5,
            "writes": 0,
            "logical_reads": 120,
            "row_count": 10,
            "sql_text": "select * from orders",
            "current_statement": "",
            "login_name": "sa",
            "host_name": "workstation",
            "program_name": "sqlcmd",
            "captured_at": "2026-08-25T09:30:01Z",
            "event_status": "running"
        }"#
    }

    #[test]
    fn test_query_event_deserializes() {
        let event: QueryEvent = serde_json::from_str(sample_event_json()).unwrap();
        assert_eq!(event.id, "51-1724580000");
        assert_eq!(event.session_id, 51);
        assert_eq!(event.event_status, EventStatus::Running);
        assert!(!event.is_completed());
        assert!(event.wait_type.is_none());
    }

    #[test]
    fn test_event_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&EventStatus::Completed).unwrap(),
            "\"completed\""
        );
    }

    #[test]
    fn test_profiler_status_error_defaults_to_none() {
        let status: ProfilerStatus =
            serde_json::from_str(r#"{"connected": true, "capturing": false}"#).unwrap();
        assert!(status.connected);
        assert!(status.error.is_none());
    }

    #[test]
    fn test_connection_config_enums_lowercase() {
        let config: ConnectionConfig = serde_json::from_str(
            r#"{
                "server_name": "localhost\\SQLEXPRESS",
                "authentication": "sql",
                "username": "sa",
                "password": "secret",
                "database": "",
                "encrypt": "optional",
                "trust_cert": true
            }"#,
        )
        .unwrap();
        assert_eq!(config.authentication, Authentication::Sql);
        assert_eq!(config.encrypt, Encryption::Optional);
    }
}
