//! Event store and view projection
//!
//! The store preserves the user's visual scan position: an event's position
//! is fixed at first observation and never changes, even when timestamps
//! arrive non-monotonically. Updates replace in place; only an explicit
//! clear removes anything.

use std::collections::HashMap;

use sqlprof_core::QueryEvent;

/// Ordered collection of query events, keyed by event id.
#[derive(Debug, Default)]
pub struct EventFeed {
    events: Vec<QueryEvent>,
    /// id -> position of first observation
    index: HashMap<String, usize>,
}

impl EventFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert-if-absent, else replace in place at the existing position.
    pub fn upsert(&mut self, event: QueryEvent) {
        match self.index.get(&event.id) {
            Some(&pos) => self.events[pos] = event,
            None => {
                self.index.insert(event.id.clone(), self.events.len());
                self.events.push(event);
            }
        }
    }

    /// Remove all entries. Selections referencing removed ids are the
    /// caller's to invalidate.
    pub fn clear(&mut self) {
        self.events.clear();
        self.index.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Full ordered sequence, append-order of first observation.
    pub fn events(&self) -> &[QueryEvent] {
        &self.events
    }

    pub fn get(&self, id: &str) -> Option<&QueryEvent> {
        self.index.get(id).map(|&pos| &self.events[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }
}

/// Derive the filtered, optionally deduplicated view.
///
/// Pure function of its inputs, re-invoked on every change; no incremental
/// state. Filtering is case-insensitive substring match over sql text,
/// current statement, database, login, and program name. Dedup drops an
/// event whose `sql_text` is byte-identical to the immediately preceding
/// *surviving* event's; it is adjacency-based, not global.
pub fn project<'a>(events: &'a [QueryEvent], filter: &str, dedup: bool) -> Vec<&'a QueryEvent> {
    let needle = filter.to_lowercase();
    let mut out: Vec<&QueryEvent> = Vec::new();
    let mut last_sql: Option<&str> = None;

    for event in events {
        if !needle.is_empty() && !matches_filter(event, &needle) {
            continue;
        }
        if dedup && last_sql == Some(event.sql_text.as_str()) {
            continue;
        }
        last_sql = Some(event.sql_text.as_str());
        out.push(event);
    }
    out
}

fn matches_filter(event: &QueryEvent, needle_lower: &str) -> bool {
    [
        &event.sql_text,
        &event.current_statement,
        &event.database_name,
        &event.login_name,
        &event.program_name,
    ]
    .into_iter()
    .any(|field| field.to_lowercase().contains(needle_lower))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlprof_core::EventStatus;

    fn event(id: &str, sql: &str) -> QueryEvent {
        QueryEvent {
            id: id.to_string(),
            session_id: 51,
            start_time: Utc::now(),
            status: "running".to_string(),
            command: "SELECT".to_string(),
            database_name: "Northwind".to_string(),
            wait_type: None,
            wait_time: 0,
            cpu_time: 0,
            elapsed_time: 0,
            reads: 0,
            writes: 0,
            logical_reads: 0,
            row_count: 0,
            sql_text: sql.to_string(),
            current_statement: String::new(),
            login_name: "sa".to_string(),
            host_name: "host".to_string(),
            program_name: "sqlcmd".to_string(),
            captured_at: Utc::now(),
            event_status: EventStatus::Running,
        }
    }

    // ─────────────────────────────────────────────────────────
    // Store Tests
    // ─────────────────────────────────────────────────────────

    #[test]
    fn test_upsert_appends_new_ids_in_order() {
        let mut feed = EventFeed::new();
        feed.upsert(event("a", "select 1"));
        feed.upsert(event("b", "select 2"));
        feed.upsert(event("c", "select 3"));

        let ids: Vec<&str> = feed.events().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_upsert_existing_id_updates_in_place() {
        let mut feed = EventFeed::new();
        feed.upsert(event("a", "select 1"));
        feed.upsert(event("b", "select 2"));

        let mut updated = event("a", "select 1");
        updated.cpu_time = 99;
        updated.event_status = EventStatus::Completed;
        feed.upsert(updated);

        assert_eq!(feed.len(), 2);
        assert_eq!(feed.events()[0].id, "a");
        assert_eq!(feed.events()[0].cpu_time, 99);
        assert!(feed.events()[0].is_completed());
    }

    #[test]
    fn test_upsert_is_idempotent_on_length() {
        let mut feed = EventFeed::new();
        for _ in 0..3 {
            feed.upsert(event("a", "select 1"));
        }
        assert_eq!(feed.len(), 1);
    }

    #[test]
    fn test_position_unchanged_across_intervening_updates() {
        let mut feed = EventFeed::new();
        feed.upsert(event("a", "select 1"));
        feed.upsert(event("b", "select 2"));
        feed.upsert(event("a", "select 1 -- updated"));
        feed.upsert(event("c", "select 3"));

        let ids: Vec<&str> = feed.events().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_clear_empties_store_and_index() {
        let mut feed = EventFeed::new();
        feed.upsert(event("a", "select 1"));
        feed.clear();

        assert!(feed.is_empty());
        assert!(!feed.contains("a"));
        // After clear, a re-observed id starts over at position 0.
        feed.upsert(event("a", "select 1"));
        assert_eq!(feed.len(), 1);
    }

    #[test]
    fn test_get_by_id() {
        let mut feed = EventFeed::new();
        feed.upsert(event("a", "select 1"));
        assert_eq!(feed.get("a").map(|e| e.sql_text.as_str()), Some("select 1"));
        assert!(feed.get("missing").is_none());
    }

    // ─────────────────────────────────────────────────────────
    // Projection Tests
    // ─────────────────────────────────────────────────────────

    #[test]
    fn test_empty_filter_passes_everything() {
        let events = vec![event("a", "select 1"), event("b", "select 2")];
        assert_eq!(project(&events, "", false).len(), 2);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let mut e = event("a", "select 1");
        e.database_name = "ABCdef".to_string();
        let events = vec![e];
        assert_eq!(project(&events, "abc", false).len(), 1);
    }

    #[test]
    fn test_filter_excludes_non_matching() {
        let events = vec![event("a", "xyz")];
        assert!(project(&events, "abc", false).is_empty());
    }

    #[test]
    fn test_filter_covers_all_five_fields() {
        let mut e = event("a", "");
        e.current_statement = "update t set x = 1".to_string();
        let events = vec![e];
        assert_eq!(project(&events, "UPDATE", false).len(), 1);

        let mut e = event("b", "");
        e.login_name = "report_user".to_string();
        let events = vec![e];
        assert_eq!(project(&events, "report", false).len(), 1);

        let mut e = event("c", "");
        e.program_name = "SSMS".to_string();
        let events = vec![e];
        assert_eq!(project(&events, "ssms", false).len(), 1);
    }

    #[test]
    fn test_dedup_is_adjacency_based_not_global() {
        let events = vec![
            event("a", "select 1"),
            event("b", "select 2"),
            event("c", "select 1"),
        ];
        // c is not adjacent to a, so all three survive
        assert_eq!(project(&events, "", true).len(), 3);
    }

    #[test]
    fn test_dedup_drops_adjacent_identical_sql() {
        let events = vec![event("a", "select 1"), event("b", "select 1")];
        let view = project(&events, "", true);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].id, "a");
    }

    #[test]
    fn test_dedup_applies_after_filtering() {
        // b does not match the filter; a and c become adjacent survivors.
        let mut b = event("b", "other statement");
        b.database_name = "elsewhere".to_string();
        b.login_name = "nobody".to_string();
        b.program_name = "none".to_string();
        let events = vec![event("a", "select 1"), b, event("c", "select 1")];

        let view = project(&events, "select", true);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].id, "a");
    }

    #[test]
    fn test_projection_does_not_mutate_inputs() {
        let events = vec![event("a", "select 1"), event("b", "select 1")];
        let _ = project(&events, "", true);
        assert_eq!(events.len(), 2);
    }
}
