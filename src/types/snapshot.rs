//! Snapshot and diff data types for the snapshot/restore engine.

use serde::{Deserialize, Serialize};

/// Reason a snapshot was captured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    /// Explicitly requested by the user.
    Manual,
    /// Captured automatically before an install.
    Install,
    /// Captured automatically before an uninstall.
    Uninstall,
    /// Captured automatically before an upgrade.
    Upgrade,
}

/// A single package entry within a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotPackage {
    /// Package name.
    pub name: String,
    /// Installed version at capture time.
    pub version: String,
    /// Backend identifier the package was captured from.
    pub source: String,
}

/// A point-in-time record of the installed package set across all backends.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SnapshotMeta {
    /// Timestamp-derived, lexicographically time-ordered identifier.
    pub id: String,
    /// Capture time, RFC3339.
    pub timestamp: String,
    /// User- or system-supplied description.
    pub description: String,
    /// Why this snapshot was captured.
    pub trigger: Trigger,
    /// Operation name associated with the trigger, if any (e.g. `"install firefox"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    /// Package names the triggering operation targeted.
    #[serde(default)]
    pub targets: Vec<String>,
}

/// What: A point-in-time record of the installed package set across all
/// backends.
///
/// Inputs: None (created via `capture`/`capture_and_save`)
///
/// Output: `Snapshot` — [`SnapshotMeta`] plus the captured package set
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    /// Snapshot identity and capture context.
    #[serde(flatten)]
    pub meta: SnapshotMeta,
    /// Captured packages, deduplicated per backend.
    pub packages: Vec<SnapshotPackage>,
}

/// Classification of how a package's presence differs between two snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChangeKind {
    /// Present in `to` but not `from`.
    Added,
    /// Present in `from` but not `to`.
    Removed,
    /// Present in both, version increased.
    Upgraded,
    /// Present in both, version decreased.
    Downgraded,
}

/// A single package-level difference between two snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    /// What kind of change this is.
    pub kind: ChangeKind,
    /// Backend the package belongs to.
    pub source: String,
    /// Package name.
    pub name: String,
    /// Version in the `from` snapshot, if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_version: Option<String>,
    /// Version in the `to` snapshot, if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_version: Option<String>,
}

/// The structural difference between two snapshots.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Diff {
    /// Changes sorted by `(kind, source, name)`.
    pub changes: Vec<Change>,
}

impl Diff {
    /// Swap `Added`↔`Removed` and `Upgraded`↔`Downgraded` (with versions swapped too).
    #[must_use]
    pub fn invert(&self) -> Self {
        let mut changes: Vec<Change> = self
            .changes
            .iter()
            .map(|c| match c.kind {
                ChangeKind::Added => Change {
                    kind: ChangeKind::Removed,
                    source: c.source.clone(),
                    name: c.name.clone(),
                    old_version: c.new_version.clone(),
                    new_version: None,
                },
                ChangeKind::Removed => Change {
                    kind: ChangeKind::Added,
                    source: c.source.clone(),
                    name: c.name.clone(),
                    old_version: None,
                    new_version: c.old_version.clone(),
                },
                ChangeKind::Upgraded => Change {
                    kind: ChangeKind::Downgraded,
                    source: c.source.clone(),
                    name: c.name.clone(),
                    old_version: c.new_version.clone(),
                    new_version: c.old_version.clone(),
                },
                ChangeKind::Downgraded => Change {
                    kind: ChangeKind::Upgraded,
                    source: c.source.clone(),
                    name: c.name.clone(),
                    old_version: c.new_version.clone(),
                    new_version: c.old_version.clone(),
                },
            })
            .collect();
        changes.sort_by(|a, b| {
            (a.kind, &a.source, &a.name).cmp(&(b.kind, &b.source, &b.name))
        });
        Self { changes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invert_swaps_added_and_removed() {
        let diff = Diff {
            changes: vec![Change {
                kind: ChangeKind::Added,
                source: "pacman".into(),
                name: "git".into(),
                old_version: None,
                new_version: Some("2.45".into()),
            }],
        };
        let inverted = diff.invert();
        assert_eq!(inverted.changes[0].kind, ChangeKind::Removed);
        assert_eq!(inverted.changes[0].old_version.as_deref(), Some("2.45"));
    }

    #[test]
    fn invert_is_involutive() {
        let diff = Diff {
            changes: vec![
                Change {
                    kind: ChangeKind::Removed,
                    source: "flatpak".into(),
                    name: "org.gimp.GIMP".into(),
                    old_version: Some("2.10".into()),
                    new_version: None,
                },
                Change {
                    kind: ChangeKind::Upgraded,
                    source: "pacman".into(),
                    name: "vim".into(),
                    old_version: Some("9.0".into()),
                    new_version: Some("9.1".into()),
                },
            ],
        };
        assert_eq!(diff.invert().invert().changes, diff.changes);
    }
}
