//! Executing a [`RestorePlan`] against live backends.

use crate::error::PoxyError;
use crate::manager::Manager;
use crate::snapshot::planner::{RestoreOptions, RestorePlan};
use crate::types::manager::{InstallOptions, UninstallOptions};
use std::collections::HashMap;

/// What: Execute a [`RestorePlan`] against live backends.
///
/// Inputs:
/// - `plan`: additions/removals to execute
/// - `managers`: registered backends keyed by source name
/// - `opts`: auto-confirm/dry-run flags passed through to each call
///
/// Output:
/// - `(usize, Option<PoxyError>)`: count of source-level operations that
///   succeeded, plus the first error encountered, if any
///
/// Details:
/// - Runs every source in `plan.to_add` (install), then every source in
///   `plan.to_remove` (uninstall) — installs always precede removes, the
///   safer ordering when a package move straddles two sources
/// - A source with no registered manager yields a per-source error without
///   aborting the rest of the plan
pub async fn execute(
    plan: &RestorePlan,
    managers: &HashMap<String, &dyn Manager>,
    opts: &RestoreOptions,
) -> (usize, Option<PoxyError>) {
    let mut successful = 0;
    let mut first_error = None;

    for (source, packages) in &plan.to_add {
        match managers.get(source.as_str()) {
            Some(manager) => {
                let install_opts = InstallOptions { auto_confirm: opts.auto_confirm, dry_run: opts.dry_run, reinstall: false };
                match manager.install(packages, &install_opts).await {
                    Ok(()) => successful += 1,
                    Err(err) if first_error.is_none() => first_error = Some(err),
                    Err(_) => {}
                }
            }
            None if first_error.is_none() => {
                first_error = Some(PoxyError::SourceUnavailable(source.clone()));
            }
            None => {}
        }
    }

    for (source, packages) in &plan.to_remove {
        match managers.get(source.as_str()) {
            Some(manager) => {
                let uninstall_opts = UninstallOptions {
                    auto_confirm: opts.auto_confirm,
                    dry_run: opts.dry_run,
                    purge: false,
                    recursive: false,
                };
                match manager.uninstall(packages, &uninstall_opts).await {
                    Ok(()) => successful += 1,
                    Err(err) if first_error.is_none() => first_error = Some(err),
                    Err(_) => {}
                }
            }
            None if first_error.is_none() => {
                first_error = Some(PoxyError::SourceUnavailable(source.clone()));
            }
            None => {}
        }
    }

    (successful, first_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::ManagerKind;
    use crate::types::manager::{CleanOptions, ListOptions, SearchOptions, UpgradeOptions};
    use crate::types::package::{Package, PackageInfo};

    struct StubManager;

    #[async_trait::async_trait]
    impl Manager for StubManager {
        fn name(&self) -> &str {
            "pacman"
        }
        fn display_name(&self) -> &str {
            "Pacman"
        }
        fn manager_type(&self) -> ManagerKind {
            ManagerKind::Native
        }
        async fn is_available(&self) -> bool {
            true
        }
        fn needs_sudo(&self) -> bool {
            true
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
            Err(PoxyError::NotFound)
        }
        async fn list_installed(&self, _opts: &ListOptions) -> crate::error::Result<Vec<Package>> {
            Ok(Vec::new())
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

    #[tokio::test]
    async fn dry_run_restore_with_only_a_removal_reports_one_success_and_makes_no_calls() {
        let mut plan = RestorePlan::default();
        plan.to_remove.insert("pacman".to_string(), vec!["git".to_string()]);
        let stub = StubManager;
        let managers: HashMap<String, &dyn Manager> = HashMap::from([("pacman".to_string(), &stub as &dyn Manager)]);
        let opts = RestoreOptions { dry_run: true, ..Default::default() };
        let (count, err) = execute(&plan, &managers, &opts).await;
        assert_eq!(count, 1);
        assert!(err.is_none());
    }

    #[tokio::test]
    async fn installs_run_before_removes() {
        let mut plan = RestorePlan::default();
        plan.to_add.insert("pacman".to_string(), vec!["neovim".to_string()]);
        plan.to_remove.insert("pacman".to_string(), vec!["vim".to_string()]);
        let stub = StubManager;
        let managers: HashMap<String, &dyn Manager> = HashMap::from([("pacman".to_string(), &stub as &dyn Manager)]);
        let (count, err) = execute(&plan, &managers, &RestoreOptions::default()).await;
        assert_eq!(count, 2);
        assert!(err.is_none());
    }

    #[tokio::test]
    async fn missing_manager_does_not_block_other_sources() {
        let mut plan = RestorePlan::default();
        plan.to_remove.insert("unknown-source".to_string(), vec!["thing".to_string()]);
        plan.to_remove.insert("pacman".to_string(), vec!["git".to_string()]);
        let stub = StubManager;
        let managers: HashMap<String, &dyn Manager> = HashMap::from([("pacman".to_string(), &stub as &dyn Manager)]);
        let (count, err) = execute(&plan, &managers, &RestoreOptions::default()).await;
        assert_eq!(count, 1);
        assert!(matches!(err, Some(PoxyError::SourceUnavailable(_))));
    }
}
