//! Structural diffing between two snapshots.

use crate::types::snapshot::{Change, ChangeKind, Diff, Snapshot};
use std::collections::HashMap;

/// What: Classify every package's change between two snapshots.
///
/// Inputs:
/// - `from`: the earlier snapshot
/// - `to`: the later snapshot
///
/// Output:
/// - `Diff` with one `Change` per package that differs, sorted by
///   `(kind, source, name)`
///
/// Details:
/// - Builds `(source, name) -> version` maps from both snapshots and
///   classifies each key as `Added`, `Removed`, `Upgraded`, or `Downgraded`
/// - Version comparison is lexical: `from < to` is an upgrade, anything
///   else (equal versions produce no change at all) a downgrade
#[must_use]
pub fn compare(from: &Snapshot, to: &Snapshot) -> Diff {
    let from_map: HashMap<(&str, &str), &str> =
        from.packages.iter().map(|p| ((p.source.as_str(), p.name.as_str()), p.version.as_str())).collect();
    let to_map: HashMap<(&str, &str), &str> =
        to.packages.iter().map(|p| ((p.source.as_str(), p.name.as_str()), p.version.as_str())).collect();

    let mut changes = Vec::new();

    for (key, &to_version) in &to_map {
        match from_map.get(key) {
            None => changes.push(Change {
                kind: ChangeKind::Added,
                source: key.0.to_string(),
                name: key.1.to_string(),
                old_version: None,
                new_version: Some(to_version.to_string()),
            }),
            Some(&from_version) if from_version != to_version => {
                let kind = if from_version < to_version { ChangeKind::Upgraded } else { ChangeKind::Downgraded };
                changes.push(Change {
                    kind,
                    source: key.0.to_string(),
                    name: key.1.to_string(),
                    old_version: Some(from_version.to_string()),
                    new_version: Some(to_version.to_string()),
                });
            }
            Some(_) => {}
        }
    }
    for (key, &from_version) in &from_map {
        if !to_map.contains_key(key) {
            changes.push(Change {
                kind: ChangeKind::Removed,
                source: key.0.to_string(),
                name: key.1.to_string(),
                old_version: Some(from_version.to_string()),
                new_version: None,
            });
        }
    }

    changes.sort_by(|a, b| (a.kind, &a.source, &a.name).cmp(&(b.kind, &b.source, &b.name)));
    Diff { changes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::snapshot::{SnapshotMeta, SnapshotPackage, Trigger};

    fn snapshot(packages: Vec<(&str, &str, &str)>) -> Snapshot {
        Snapshot {
            meta: SnapshotMeta {
                id: String::new(),
                timestamp: String::new(),
                description: String::new(),
                trigger: Trigger::Manual,
                operation: None,
                targets: Vec::new(),
            },
            packages: packages
                .into_iter()
                .map(|(source, name, version)| SnapshotPackage {
                    name: name.to_string(),
                    version: version.to_string(),
                    source: source.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn detects_one_addition() {
        let a = snapshot(vec![("pacman", "vim", "9.0"), ("flatpak", "org.mozilla.firefox", "125.0")]);
        let b = snapshot(vec![
            ("pacman", "vim", "9.0"),
            ("flatpak", "org.mozilla.firefox", "125.0"),
            ("pacman", "git", "2.45"),
        ]);
        let diff = compare(&a, &b);
        assert_eq!(diff.changes.len(), 1);
        assert_eq!(diff.changes[0].kind, ChangeKind::Added);
        assert_eq!(diff.changes[0].name, "git");
    }

    #[test]
    fn classifies_upgrade_and_downgrade_by_lexical_version() {
        let a = snapshot(vec![("pacman", "vim", "9.0"), ("pacman", "git", "2.50")]);
        let b = snapshot(vec![("pacman", "vim", "9.1"), ("pacman", "git", "2.40")]);
        let diff = compare(&a, &b);
        let vim = diff.changes.iter().find(|c| c.name == "vim").unwrap();
        let git = diff.changes.iter().find(|c| c.name == "git").unwrap();
        assert_eq!(vim.kind, ChangeKind::Upgraded);
        assert_eq!(git.kind, ChangeKind::Downgraded);
    }

    #[test]
    fn identical_snapshots_produce_no_changes() {
        let a = snapshot(vec![("pacman", "vim", "9.0")]);
        assert!(compare(&a, &a).changes.is_empty());
    }
}
