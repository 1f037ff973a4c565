//! Undo: revert to the state captured just before the most recent snapshot.

use crate::error::{PoxyError, Result};
use crate::store::SnapshotStore;
use crate::types::snapshot::Snapshot;

/// What: Resolve the snapshot to restore to for an undo operation.
///
/// Inputs:
/// - `store`: snapshot store to query
///
/// Output:
/// - `Result<Snapshot>` with the older of the two newest snapshots
///
/// Details:
/// - Fetches the two newest snapshots via `store.list(2, None)`; the
///   older one is the state to undo back to
///
/// # Errors
/// Returns [`PoxyError::NotEnoughSnapshots`] if fewer than two snapshots exist.
pub fn undo_target(store: &SnapshotStore) -> Result<Snapshot> {
    let newest_two = store.list(2, None)?;
    if newest_two.len() < 2 {
        return Err(PoxyError::NotEnoughSnapshots { needed: 2, have: newest_two.len() });
    }
    Ok(newest_two.into_iter().nth(1).expect("checked length above"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::snapshot::Trigger;

    fn temp_store() -> SnapshotStore {
        use std::sync::atomic::{AtomicU32, Ordering};
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        SnapshotStore::open_with_prefix(&format!("test-undo-{}-{n}-", std::process::id())).expect("should open")
    }

    fn empty_snapshot(description: &str) -> Snapshot {
        Snapshot {
            meta: crate::types::snapshot::SnapshotMeta {
                id: String::new(),
                timestamp: String::new(),
                description: description.to_string(),
                trigger: Trigger::Manual,
                operation: None,
                targets: Vec::new(),
            },
            packages: Vec::new(),
        }
    }

    #[test]
    fn fewer_than_two_snapshots_is_an_error() {
        let store = temp_store();
        store.save(empty_snapshot("only one")).expect("should save");
        assert!(matches!(undo_target(&store), Err(PoxyError::NotEnoughSnapshots { .. })));
        store.clear().expect("should clear");
    }

    #[test]
    fn undo_target_is_the_older_of_the_two_newest() {
        let store = temp_store();
        store.save(empty_snapshot("older")).expect("should save");
        std::thread::sleep(std::time::Duration::from_millis(2));
        store.save(empty_snapshot("newer")).expect("should save");
        let target = undo_target(&store).expect("should find a target");
        assert_eq!(target.meta.description, "older");
        store.clear().expect("should clear");
    }
}
