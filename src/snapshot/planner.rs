//! Computing a restore plan from a target snapshot and the current state.

use crate::manager::Manager;
use crate::snapshot::capture::capture;
use crate::snapshot::differ::compare;
use crate::types::snapshot::{Change, ChangeKind, Snapshot, Trigger};
use std::collections::BTreeMap;

/// Options governing how a restore plan is computed and executed.
#[derive(Clone, Debug, Default)]
pub struct RestoreOptions {
    /// Restrict the diff (and the resulting plan) to these sources, if set.
    pub sources: Option<Vec<String>>,
    /// Skip interactive confirmation when the plan is executed.
    pub auto_confirm: bool,
    /// Print what would run without executing it, when the plan is executed.
    pub dry_run: bool,
}

/// What to add and remove, per source, to move the current state to the target.
#[derive(Clone, Debug, Default)]
pub struct RestorePlan {
    /// Package names to install, keyed by source, sorted alphabetically.
    pub to_add: BTreeMap<String, Vec<String>>,
    /// Package names to uninstall, keyed by source, sorted alphabetically.
    pub to_remove: BTreeMap<String, Vec<String>>,
    /// Version changes noted but not acted on in this version of the planner.
    pub downgrades: Vec<Change>,
}

fn filter_by_sources(mut snapshot: Snapshot, sources: Option<&[String]>) -> Snapshot {
    if let Some(sources) = sources {
        snapshot.packages.retain(|p| sources.iter().any(|s| s == &p.source));
    }
    snapshot
}

/// What: Compute what must change to move the current state to `target`.
///
/// Inputs:
/// - `target`: snapshot to restore to
/// - `managers`: backends to capture the current state from
/// - `opts`: source filter, auto-confirm/dry-run flags for execution
///
/// Output:
/// - `RestorePlan` with per-source additions/removals and any version
///   changes noted but not acted on
///
/// Details:
/// - Captures the current installed state, diffs it against `target`, and
///   buckets `Added`/`Removed` changes into `to_add`/`to_remove`;
///   `Upgraded`/`Downgraded` changes are recorded in `downgrades` but not
///   acted on, per the planner's v1 scope
pub async fn plan_restore(target: &Snapshot, managers: &[&dyn Manager], opts: &RestoreOptions) -> RestorePlan {
    let current = capture(managers, Trigger::Manual, "restore-plan baseline", None, Vec::new()).await;
    let current = filter_by_sources(current, opts.sources.as_deref());
    let target = filter_by_sources(target.clone(), opts.sources.as_deref());

    let diff = compare(&current, &target);
    let mut plan = RestorePlan::default();
    for change in diff.changes {
        match change.kind {
            ChangeKind::Added => plan.to_add.entry(change.source).or_default().push(change.name),
            ChangeKind::Removed => plan.to_remove.entry(change.source).or_default().push(change.name),
            ChangeKind::Upgraded | ChangeKind::Downgraded => plan.downgrades.push(change),
        }
    }
    for names in plan.to_add.values_mut().chain(plan.to_remove.values_mut()) {
        names.sort();
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::ManagerKind;
    use crate::types::manager::{CleanOptions, InstallOptions, ListOptions, SearchOptions, UninstallOptions, UpgradeOptions};
    use crate::types::package::{Package, PackageInfo};

    struct StubManager {
        name: &'static str,
        installed: Vec<Package>,
    }

    #[async_trait::async_trait]
    impl Manager for StubManager {
        fn name(&self) -> &str {
            self.name
        }
        fn display_name(&self) -> &str {
            self.name
        }
        fn manager_type(&self) -> ManagerKind {
            ManagerKind::Native
        }
        async fn is_available(&self) -> bool {
            true
        }
        fn needs_sudo(&self) -> bool {
            false
        }
        async fn install(&self, _packages: &[String], _opts: &InstallOptions) -> crate::error::Result<()> {
            Ok(())
        }
        async fn uninstall(&self, _packages: &[String], _opts: &UninstallOptions) -> crate::error::Result<()> {
            Ok(())
        }
        async fn update(&self) -> crate::error::Result<()> {
            Ok(())
        }
        async fn upgrade(&self, _opts: &UpgradeOptions) -> crate::error::Result<()> {
            Ok(())
        }
        async fn search(&self, _query: &str, _opts: &SearchOptions) -> crate::error::Result<Vec<Package>> {
            Ok(Vec::new())
        }
        async fn info(&self, _name: &str) -> crate::error::Result<PackageInfo> {
            Err(crate::error::PoxyError::NotFound)
        }
        async fn list_installed(&self, _opts: &ListOptions) -> crate::error::Result<Vec<Package>> {
            Ok(self.installed.clone())
        }
        async fn is_installed(&self, _name: &str) -> bool {
            false
        }
        async fn clean(&self, _opts: &CleanOptions) -> crate::error::Result<()> {
            Ok(())
        }
        async fn autoremove(&self) -> crate::error::Result<()> {
            Ok(())
        }
    }

    fn pkg(name: &str, version: &str, source: &str) -> Package {
        Package {
            name: name.to_string(),
            version: version.to_string(),
            description: String::new(),
            source: source.to_string(),
            installed: true,
            size: None,
        }
    }

    #[tokio::test]
    async fn plan_restore_of_the_current_state_is_empty() {
        let pacman = StubManager { name: "pacman", installed: vec![pkg("vim", "9.0", "pacman")] };
        let managers: Vec<&dyn Manager> = vec![&pacman];
        let target = capture(&managers, Trigger::Manual, "baseline", None, Vec::new()).await;
        let plan = plan_restore(&target, &managers, &RestoreOptions::default()).await;
        assert!(plan.to_add.is_empty());
        assert!(plan.to_remove.is_empty());
    }

    #[tokio::test]
    async fn restoring_to_a_snapshot_missing_git_queues_a_removal() {
        let pacman = StubManager {
            name: "pacman",
            installed: vec![pkg("vim", "9.0", "pacman"), pkg("git", "2.45", "pacman")],
        };
        let managers: Vec<&dyn Manager> = vec![&pacman];
        let target = Snapshot {
            meta: crate::types::snapshot::SnapshotMeta {
                id: "a".to_string(),
                timestamp: String::new(),
                description: "before git".to_string(),
                trigger: Trigger::Manual,
                operation: None,
                targets: Vec::new(),
            },
            packages: vec![crate::types::snapshot::SnapshotPackage {
                name: "vim".to_string(),
                version: "9.0".to_string(),
                source: "pacman".to_string(),
            }],
        };
        let plan = plan_restore(&target, &managers, &RestoreOptions::default()).await;
        assert_eq!(plan.to_remove.get("pacman"), Some(&vec!["git".to_string()]));
        assert!(plan.to_add.is_empty());
    }
}
