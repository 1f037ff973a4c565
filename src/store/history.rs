//! Append-only operation ledger.

use crate::error::Result;
use crate::store::kv::KvStore;
use crate::store::sortable_id;
use crate::types::history::{HistoryEntry, Operation};
use chrono::Utc;

const NAMESPACE: &str = "history";

/// What: Persistent, append-only log of install/uninstall/upgrade/update/
/// clean operations.
///
/// Inputs: None (constructed via `HistoryLog::open`)
///
/// Output: `HistoryLog` instance ready for use
///
/// Details:
/// - Entries are keyed by a sortable, timestamp-derived entry ID so a
///   directory listing naturally sorts oldest-first
#[derive(Debug)]
pub struct HistoryLog {
    kv: KvStore,
}

impl HistoryLog {
    /// Open the history log, creating its namespace if absent.
    ///
    /// # Errors
    /// Returns [`crate::error::PoxyError::Io`] if the namespace cannot be opened.
    pub fn open() -> Result<Self> {
        Ok(Self { kv: KvStore::open(NAMESPACE)? })
    }

    #[cfg(test)]
    fn open_with_prefix(prefix: &str) -> Result<Self> {
        Ok(Self { kv: KvStore::open(&format!("{prefix}{NAMESPACE}"))? })
    }

    /// Release the log's namespace lock.
    ///
    /// # Errors
    /// Returns [`crate::error::PoxyError::Io`] if the unlock syscall fails.
    pub fn close(&self) -> Result<()> {
        self.kv.close()
    }

    /// Build a new, not-yet-recorded entry: fills `timestamp = now` and
    /// `reversible`/`reverse_op` from the operation kind, leaves
    /// `success = false` for the caller to set once the operation completes.
    #[must_use]
    pub fn new_entry(op: Operation, source: impl Into<String>, packages: Vec<String>) -> HistoryEntry {
        let mut entry = HistoryEntry::new(op, source, packages);
        entry.timestamp = Utc::now().to_rfc3339();
        entry
    }

    /// Assign an ID and persist one entry.
    ///
    /// # Errors
    /// Returns [`crate::error::PoxyError::Io`] or
    /// [`crate::error::PoxyError::Json`].
    pub fn record(&self, mut entry: HistoryEntry) -> Result<HistoryEntry> {
        entry.id = sortable_id();
        self.kv.set(&entry.id, &entry)?;
        Ok(entry)
    }

    /// The `limit` most recent entries, newest first. `limit = 0` returns all.
    ///
    /// # Errors
    /// Returns [`crate::error::PoxyError::Io`] or
    /// [`crate::error::PoxyError::Json`].
    pub fn list(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let mut entries = self.all_sorted_desc()?;
        if limit > 0 {
            entries.truncate(limit);
        }
        Ok(entries)
    }

    /// Fetch one entry by ID.
    ///
    /// # Errors
    /// Returns [`crate::error::PoxyError::Io`] or
    /// [`crate::error::PoxyError::Json`].
    pub fn get(&self, id: &str) -> Result<Option<HistoryEntry>> {
        self.kv.get(id)
    }

    /// The single most recent entry, if any.
    ///
    /// # Errors
    /// Same as [`HistoryLog::list`].
    pub fn last(&self) -> Result<Option<HistoryEntry>> {
        Ok(self.all_sorted_desc()?.into_iter().next())
    }

    /// The most recent entry eligible for rollback, if any.
    ///
    /// # Errors
    /// Same as [`HistoryLog::list`].
    pub fn last_reversible(&self) -> Result<Option<HistoryEntry>> {
        Ok(self.all_sorted_desc()?.into_iter().find(HistoryEntry::can_rollback))
    }

    /// Total number of recorded entries.
    ///
    /// # Errors
    /// Returns [`crate::error::PoxyError::Io`].
    pub fn count(&self) -> Result<usize> {
        self.kv.count()
    }

    /// Remove every entry.
    ///
    /// # Errors
    /// Returns [`crate::error::PoxyError::Io`].
    pub fn clear(&self) -> Result<()> {
        self.kv.clear()
    }

    /// Delete entries older than `max_age`, returning the count deleted.
    ///
    /// # Errors
    /// Returns [`crate::error::PoxyError::Io`] or
    /// [`crate::error::PoxyError::Json`].
    pub fn prune(&self, max_age: chrono::Duration) -> Result<usize> {
        let cutoff = Utc::now() - max_age;
        let mut deleted = 0;
        for entry in self.all_sorted_desc()? {
            let Ok(ts) = chrono::DateTime::parse_from_rfc3339(&entry.timestamp) else {
                continue;
            };
            if ts < cutoff {
                self.kv.delete(&entry.id)?;
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    fn all_sorted_desc(&self) -> Result<Vec<HistoryEntry>> {
        let mut entries = Vec::new();
        for key in self.kv.keys()? {
            if let Some(entry) = self.kv.get::<HistoryEntry>(&key)? {
                entries.push(entry);
            }
        }
        entries.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log() -> HistoryLog {
        use std::sync::atomic::{AtomicU32, Ordering};
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        HistoryLog::open_with_prefix(&format!("test-hist-{}-{n}-", std::process::id()))
            .expect("should open")
    }

    fn recorded(log: &HistoryLog, source: &str, success: bool) -> HistoryEntry {
        let mut entry = HistoryLog::new_entry(Operation::Install, source, vec!["git".into()]);
        entry.success = success;
        log.record(entry).expect("should record")
    }

    #[test]
    fn list_returns_newest_first_and_respects_limit() {
        let log = temp_log();
        for i in 0..5 {
            recorded(&log, &format!("src{i}"), true);
        }
        let newest_three = log.list(3).expect("should list");
        assert_eq!(newest_three.len(), 3);
        assert_eq!(newest_three[0].source, "src4");
        assert_eq!(log.list(0).expect("should list all").len(), 5);
    }

    #[test]
    fn last_reversible_skips_non_rollback_entries() {
        let log = temp_log();
        let mut update = HistoryLog::new_entry(Operation::Update, "pacman", vec![]);
        update.success = true;
        log.record(update).expect("should record");
        recorded(&log, "pacman", true);
        let last = log.last_reversible().expect("should find").expect("present");
        assert_eq!(last.operation, Operation::Install);
    }

    #[test]
    fn count_reflects_recorded_entries() {
        let log = temp_log();
        recorded(&log, "a", true);
        recorded(&log, "b", true);
        assert_eq!(log.count().expect("should count"), 2);
    }
}
