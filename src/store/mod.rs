//! Persistent on-disk stores: package metadata, operation history, and
//! point-in-time snapshots, all layered on the namespaced [`kv::KvStore`].

pub mod history;
pub mod kv;
pub mod metadata;

#[cfg(feature = "snapshot")]
pub mod snapshot;

pub use history::HistoryLog;
pub use kv::KvStore;
pub use metadata::{MetadataStore, PackageEntry};

#[cfg(feature = "snapshot")]
pub use snapshot::SnapshotStore;

use std::sync::atomic::{AtomicU32, Ordering};

/// Fold to lowercase, split on non-alphanumeric boundaries, discard empty
/// tokens. Shared with the TF-IDF index so both tokenize identically;
/// the index additionally drops tokens shorter than two characters.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// A lexicographically time-ordered identifier: an RFC3339-like timestamp
/// with a monotonic counter suffix so two calls within the same microsecond
/// still sort distinctly.
pub(crate) fn sortable_id() -> String {
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let now = chrono::Utc::now();
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}-{seq:06}", now.format("%Y%m%dT%H%M%S%.6f"))
}
