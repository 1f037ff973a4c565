//! Persistent store for point-in-time package-set snapshots.

use crate::error::Result;
use crate::store::kv::KvStore;
use crate::store::sortable_id;
use crate::types::snapshot::{Snapshot, Trigger};

const NAMESPACE: &str = "snapshots";

/// What: Persistent, keyed store of [`Snapshot`]s.
///
/// Inputs: None (constructed via `SnapshotStore::open`)
///
/// Output: `SnapshotStore` instance ready for use
///
/// Details:
/// - Entries are keyed by a sortable, timestamp-derived snapshot ID, so
///   `list` can return the newest entries without a separate sort pass
#[derive(Debug)]
pub struct SnapshotStore {
    kv: KvStore,
}

impl SnapshotStore {
    /// Open the snapshot store, creating its namespace if absent.
    ///
    /// # Errors
    /// Returns [`crate::error::PoxyError::Io`] if the namespace cannot be opened.
    pub fn open() -> Result<Self> {
        Ok(Self { kv: KvStore::open(NAMESPACE)? })
    }

    #[cfg(test)]
    pub(crate) fn open_with_prefix(prefix: &str) -> Result<Self> {
        Ok(Self { kv: KvStore::open(&format!("{prefix}{NAMESPACE}"))? })
    }

    /// Release the store's namespace lock.
    ///
    /// # Errors
    /// Returns [`crate::error::PoxyError::Io`] if the unlock syscall fails.
    pub fn close(&self) -> Result<()> {
        self.kv.close()
    }

    /// Assign an ID (if absent) and persist a snapshot.
    ///
    /// # Errors
    /// Returns [`crate::error::PoxyError::Io`] or
    /// [`crate::error::PoxyError::Json`].
    pub fn save(&self, mut snapshot: Snapshot) -> Result<Snapshot> {
        if snapshot.meta.id.is_empty() {
            snapshot.meta.id = sortable_id();
        }
        self.kv.set(&snapshot.meta.id, &snapshot)?;
        Ok(snapshot)
    }

    /// Fetch one snapshot by ID.
    ///
    /// # Errors
    /// Returns [`crate::error::PoxyError::Io`] or
    /// [`crate::error::PoxyError::Json`].
    pub fn get(&self, id: &str) -> Result<Option<Snapshot>> {
        self.kv.get(id)
    }

    /// Snapshots newest-first, optionally filtered by trigger, truncated to
    /// `limit` (`limit = 0` returns all matching).
    ///
    /// # Errors
    /// Returns [`crate::error::PoxyError::Io`] or
    /// [`crate::error::PoxyError::Json`].
    pub fn list(&self, limit: usize, trigger_filter: Option<Trigger>) -> Result<Vec<Snapshot>> {
        let mut snapshots: Vec<Snapshot> = self
            .all()?
            .into_iter()
            .filter(|s| trigger_filter.is_none_or(|t| s.meta.trigger == t))
            .collect();
        snapshots.sort_by(|a, b| b.meta.id.cmp(&a.meta.id));
        if limit > 0 {
            snapshots.truncate(limit);
        }
        Ok(snapshots)
    }

    /// Remove one snapshot; a missing ID is not an error.
    ///
    /// # Errors
    /// Returns [`crate::error::PoxyError::Io`].
    pub fn delete(&self, id: &str) -> Result<()> {
        self.kv.delete(id)
    }

    /// Total number of stored snapshots.
    ///
    /// # Errors
    /// Returns [`crate::error::PoxyError::Io`].
    pub fn count(&self) -> Result<usize> {
        self.kv.count()
    }

    /// Never delete a [`Trigger::Manual`] snapshot. Additionally keep the
    /// `keep_auto` most recent non-manual snapshots, then top up the
    /// overall retained count to `keep_total` with whatever is next most
    /// recent. Returns the number deleted.
    ///
    /// # Errors
    /// Returns [`crate::error::PoxyError::Io`] or
    /// [`crate::error::PoxyError::Json`].
    pub fn prune(&self, keep_total: usize, keep_auto: usize) -> Result<usize> {
        let all = self.list(0, None)?;

        let mut keep: std::collections::HashSet<&str> = all
            .iter()
            .filter(|s| s.meta.trigger == Trigger::Manual)
            .map(|s| s.meta.id.as_str())
            .collect();
        keep.extend(
            all.iter()
                .filter(|s| s.meta.trigger != Trigger::Manual)
                .take(keep_auto)
                .map(|s| s.meta.id.as_str()),
        );
        // `all` is already sorted newest-first; top up to `keep_total` as a
        // floor on the overall retained count without displacing anything
        // already kept above.
        for snapshot in &all {
            if keep.len() >= keep_total {
                break;
            }
            keep.insert(snapshot.meta.id.as_str());
        }

        let mut deleted = 0;
        for snapshot in &all {
            if !keep.contains(snapshot.meta.id.as_str()) {
                self.delete(&snapshot.meta.id)?;
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    fn all(&self) -> Result<Vec<Snapshot>> {
        let mut snapshots = Vec::new();
        for key in self.kv.keys()? {
            if let Some(snapshot) = self.kv.get::<Snapshot>(&key)? {
                snapshots.push(snapshot);
            }
        }
        Ok(snapshots)
    }
}
