//! Capturing the installed-package set across multiple backends into a [`Snapshot`].

use crate::error::Result;
use crate::manager::Manager;
use crate::types::manager::ListOptions;
use crate::types::snapshot::{Snapshot, SnapshotMeta, SnapshotPackage, Trigger};

#[cfg(feature = "cache-disk")]
use crate::store::SnapshotStore;

/// What: Capture the installed-package set across multiple backends.
///
/// Inputs:
/// - `managers`: backends to query
/// - `trigger`, `description`, `operation`, `targets`: snapshot metadata
///
/// Output:
/// - `Snapshot` with the union of every backend's installed packages
///
/// Details:
/// - Fans `list_installed` out across `managers`, soft-skipping any backend
///   that errors rather than failing the whole capture
pub async fn capture(
    managers: &[&dyn Manager],
    trigger: Trigger,
    description: &str,
    operation: Option<String>,
    targets: Vec<String>,
) -> Snapshot {
    let mut packages = Vec::new();
    for manager in managers {
        let Ok(installed) = manager.list_installed(&ListOptions::default()).await else { continue };
        packages.extend(installed.into_iter().map(|pkg| SnapshotPackage {
            name: pkg.name,
            version: pkg.version,
            source: manager.name().to_string(),
        }));
    }
    Snapshot {
        meta: SnapshotMeta {
            id: String::new(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            description: description.to_string(),
            trigger,
            operation,
            targets,
        },
        packages,
    }
}

/// [`capture`], then persist it. Capture itself cannot fail (managers that
/// error are just skipped); only the save step can.
///
/// # Errors
/// Propagates [`crate::store::SnapshotStore::save`] errors.
#[cfg(feature = "cache-disk")]
pub async fn capture_and_save(
    store: &SnapshotStore,
    managers: &[&dyn Manager],
    trigger: Trigger,
    description: &str,
    operation: Option<String>,
    targets: Vec<String>,
) -> Result<Snapshot> {
    let snapshot = capture(managers, trigger, description, operation, targets).await;
    store.save(snapshot)
}
