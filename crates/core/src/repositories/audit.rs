//! Append-only audit trail keyed by record id.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::models::AuditEntry;

#[derive(Debug, Default)]
pub struct AuditLog {
    entries: RwLock<HashMap<String, Vec<AuditEntry>>>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, entry: AuditEntry) {
        tracing::debug!(
            "audit {} {} by {}",
            entry.record_id,
            entry.action,
            entry.triggered_by
        );
        self.entries
            .write()
            .entry(entry.record_id.clone())
            .or_default()
            .push(entry);
    }

    /// Convenience wrapper that builds the entry.
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        &self,
        record_id: &str,
        action: &str,
        description: String,
        actor: &str,
        at: DateTime<Utc>,
        status: Option<String>,
        reason: Option<&str>,
    ) {
        self.append(AuditEntry {
            record_id: record_id.to_string(),
            action: action.to_string(),
            description,
            triggered_by: actor.to_string(),
            triggered_on: at,
            status,
            reason: reason.map(str::to_string),
        });
    }

    /// Entries for `record_id`, oldest first. Unknown ids have an empty trail.
    pub fn for_record(&self, record_id: &str) -> Vec<AuditEntry> {
        self.entries
            .read()
            .get(record_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_keep_insertion_order_per_record() {
        let log = AuditLog::new();
        let now = Utc::now();
        log.record("R1", "create", "created".into(), "alice", now, None, None);
        log.record("R2", "create", "created".into(), "alice", now, None, None);
        log.record(
            "R1",
            "cancel",
            "cancelled".into(),
            "bob",
            now,
            Some("Cancelled".into()),
            Some("duplicate"),
        );

        let trail = log.for_record("R1");
        let actions: Vec<&str> = trail.iter().map(|e| e.action.as_str()).collect();
        assert_eq!(actions, vec!["create", "cancel"]);
        assert_eq!(trail[1].reason.as_deref(), Some("duplicate"));
        assert!(log.for_record("missing").is_empty());
    }
}
