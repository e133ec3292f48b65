//! Change log of table snapshots
//!
//! Each entry is a titled, timestamped copy of the table, newest first.

use crate::model::Table;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEntry {
    pub title: String,
    pub timestamp: DateTime<Utc>,
    pub snapshot: Table,
}

impl ChangeEntry {
    pub fn fingerprint(&self) -> String {
        self.snapshot.fingerprint()
    }
}

/// Newest-first list of snapshots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeLog {
    entries: Vec<ChangeEntry>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a snapshot stamped with the current time
    pub fn record(&mut self, title: impl Into<String>, table: &Table) -> &ChangeEntry {
        self.record_at(title, table, Utc::now())
    }

    /// Record a snapshot with an explicit timestamp
    pub fn record_at(
        &mut self,
        title: impl Into<String>,
        table: &Table,
        timestamp: DateTime<Utc>,
    ) -> &ChangeEntry {
        self.entries.insert(
            0,
            ChangeEntry {
                title: title.into(),
                timestamp,
                snapshot: table.clone(),
            },
        );
        &self.entries[0]
    }

    pub fn latest(&self) -> Option<&ChangeEntry> {
        self.entries.first()
    }

    /// Entries, newest first
    pub fn entries(&self) -> &[ChangeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `table` differs from the latest snapshot
    pub fn has_unrecorded_changes(&self, table: &Table) -> bool {
        self.latest()
            .is_none_or(|entry| entry.fingerprint() != table.fingerprint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cell;
    use chrono::TimeZone;

    #[test]
    fn test_newest_first() {
        let mut log = ChangeLog::new();
        let table = Table::default();
        let t0 = Utc.with_ymd_and_hms(2025, 9, 28, 10, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2025, 9, 29, 10, 0, 0).unwrap();
        log.record_at("Initial creation", &table, t0);
        log.record_at("[Save] New Decision Table", &table, t1);
        assert_eq!(log.len(), 2);
        assert_eq!(log.latest().unwrap().timestamp, t1);
        assert_eq!(log.entries()[1].title, "Initial creation");
    }

    #[test]
    fn test_unrecorded_changes() {
        let mut log = ChangeLog::new();
        let mut table = Table::default();
        assert!(log.has_unrecorded_changes(&table));
        log.record("save", &table);
        assert!(!log.has_unrecorded_changes(&table));
        table.rows[0][0] = Cell::text("Y");
        assert!(log.has_unrecorded_changes(&table));
    }

    #[test]
    fn test_serializes_as_list() {
        let mut log = ChangeLog::new();
        log.record("save", &Table::default());
        let value = serde_json::to_value(&log).unwrap();
        assert!(value.is_array());
        let back: ChangeLog = serde_json::from_value(value).unwrap();
        assert_eq!(back, log);
    }
}
