//! A config-driven adapter for backends whose CLI is simple enough to
//! describe declaratively: one argv template per operation plus a line
//! parser for list/search output.
//!
//! Every non-pacman, non-AUR backend in the facade is an instance of this
//! adapter configured by a [`CliSpec`] constant; see the constructor
//! functions at the bottom of this file for the concrete per-backend
//! argument conventions.

use crate::error::{PoxyError, Result};
use crate::exec::{CancelToken, Executor};
use crate::manager::{
    BaseManager, CleanOptions, InstallOptions, ListOptions, Manager, ManagerKind, Package,
    PackageInfo, SearchOptions, UninstallOptions, UpgradeOptions,
};
use async_trait::async_trait;

/// Declares how a CLI-driven backend maps Manager operations onto argv.
#[derive(Clone, Copy, Debug)]
pub struct CliSpec {
    /// Flag(s) preceding package names for install.
    pub install_flag: &'static str,
    /// Flag(s) preceding package names for uninstall.
    pub uninstall_flag: &'static str,
    /// Extra flag added to uninstall when `purge` is requested, if any.
    pub purge_flag: Option<&'static str>,
    /// Flag to confirm non-interactively, if any.
    pub yes_flag: Option<&'static str>,
    /// Argv to refresh metadata only (`update`).
    pub update_args: &'static [&'static str],
    /// Argv prefix for `upgrade` (package names, if any, are appended).
    pub upgrade_args: &'static [&'static str],
    /// Argv prefix for `search` (the query is appended).
    pub search_args: &'static [&'static str],
    /// Argv for listing installed packages.
    pub list_args: &'static [&'static str],
    /// Argv prefix for `info` (the package name is appended).
    pub info_args: &'static [&'static str],
    /// Argv for a cache clean.
    pub clean_args: &'static [&'static str],
    /// Argv for a full cache wipe (`all=true`); falls back to `clean_args`.
    pub clean_all_args: Option<&'static [&'static str]>,
    /// Argv for autoremove, if the backend supports it.
    pub autoremove_args: Option<&'static [&'static str]>,
    /// Whether this backend needs elevation for mutating operations.
    pub needs_sudo: bool,
    /// Parses one line of list/search output into a `Package`.
    pub parse_line: fn(&str, &str) -> Option<Package>,
}

/// A CLI-driven backend configured entirely by a [`CliSpec`].
#[derive(Debug)]
pub struct GenericManager {
    base: BaseManager,
    spec: CliSpec,
}

impl GenericManager {
    /// Build an adapter for `name`/`display_name`/`binary`, configured by `spec`.
    #[must_use]
    pub fn new(
        name: &'static str,
        display_name: &'static str,
        manager_type: ManagerKind,
        binary: &'static str,
        spec: CliSpec,
        executor: Executor,
    ) -> Self {
        Self {
            base: BaseManager::new(name, display_name, manager_type, binary, spec.needs_sudo, executor),
            spec,
        }
    }

    fn executor_for(&self, dry_run: bool) -> Executor {
        self.base.executor.with_dry_run(dry_run)
    }

    async fn run(&self, executor: &Executor, args: &[&str]) -> Result<()> {
        let cancel = CancelToken::new();
        if self.spec.needs_sudo {
            executor.run_sudo(&cancel, &self.base.binary(), args).await
        } else {
            executor.run(&cancel, &self.base.binary(), args).await
        }
    }
}

#[async_trait]
impl Manager for GenericManager {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn display_name(&self) -> &str {
        self.base.display_name()
    }

    fn manager_type(&self) -> ManagerKind {
        self.base.manager_type()
    }

    async fn is_available(&self) -> bool {
        self.base.binary_available()
    }

    fn needs_sudo(&self) -> bool {
        self.base.needs_sudo()
    }

    async fn install(&self, packages: &[String], opts: &InstallOptions) -> Result<()> {
        let executor = self.executor_for(opts.dry_run);
        let mut args: Vec<&str> = self.spec.install_flag.split_whitespace().collect();
        if opts.auto_confirm {
            if let Some(yes) = self.spec.yes_flag {
                args.push(yes);
            }
        }
        let refs: Vec<&str> = packages.iter().map(String::as_str).collect();
        args.extend(refs);
        self.run(&executor, &args).await
    }

    async fn uninstall(&self, packages: &[String], opts: &UninstallOptions) -> Result<()> {
        let executor = self.executor_for(opts.dry_run);
        let mut args: Vec<&str> = self.spec.uninstall_flag.split_whitespace().collect();
        if opts.purge {
            if let Some(purge) = self.spec.purge_flag {
                args.push(purge);
            }
        }
        if opts.auto_confirm {
            if let Some(yes) = self.spec.yes_flag {
                args.push(yes);
            }
        }
        let refs: Vec<&str> = packages.iter().map(String::as_str).collect();
        args.extend(refs);
        self.run(&executor, &args).await?;
        if opts.recursive {
            if let Some(auto) = self.spec.autoremove_args {
                self.run(&executor, auto).await?;
            }
        }
        Ok(())
    }

    async fn update(&self) -> Result<()> {
        self.run(&self.base.executor, self.spec.update_args).await
    }

    async fn upgrade(&self, opts: &UpgradeOptions) -> Result<()> {
        let executor = self.executor_for(opts.dry_run);
        let mut args: Vec<&str> = self.spec.upgrade_args.to_vec();
        if opts.auto_confirm {
            if let Some(yes) = self.spec.yes_flag {
                args.push(yes);
            }
        }
        let refs: Vec<&str> = opts.packages.iter().map(String::as_str).collect();
        args.extend(refs);
        self.run(&executor, &args).await
    }

    async fn search(&self, query: &str, opts: &SearchOptions) -> Result<Vec<Package>> {
        let cancel = CancelToken::new();
        let mut args: Vec<&str> = self.spec.search_args.to_vec();
        args.push(query);
        let out = self
            .base
            .executor
            .output_quiet(&cancel, &self.base.binary(), &args)
            .await
            .unwrap_or_default();
        let mut packages = parse_lines(&out, self.name(), self.spec.parse_line);
        if opts.exact_match {
            packages.retain(|p| p.name.eq_ignore_ascii_case(query));
        }
        if opts.installed_only {
            packages.retain(|p| p.installed);
        }
        if opts.limit > 0 {
            packages.truncate(opts.limit);
        }
        Ok(packages)
    }

    async fn info(&self, package: &str) -> Result<PackageInfo> {
        let cancel = CancelToken::new();
        let mut args: Vec<&str> = self.spec.info_args.to_vec();
        args.push(package);
        let out = self
            .base
            .executor
            .output_quiet(&cancel, &self.base.binary(), &args)
            .await
            .map_err(|_| PoxyError::PackageNotFound(package.to_string()))?;
        let packages = parse_lines(&out, self.name(), self.spec.parse_line);
        let found = packages
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(package))
            .ok_or_else(|| PoxyError::PackageNotFound(package.to_string()))?;
        Ok(PackageInfo {
            package: found,
            repository: String::new(),
            maintainer: String::new(),
            license: String::new(),
            url: String::new(),
            dependencies: Vec::new(),
            install_timestamp: None,
        })
    }

    async fn list_installed(&self, opts: &ListOptions) -> Result<Vec<Package>> {
        let cancel = CancelToken::new();
        let out = self
            .base
            .executor
            .output_quiet(&cancel, &self.base.binary(), self.spec.list_args)
            .await
            .unwrap_or_default();
        let mut packages = parse_lines(&out, self.name(), self.spec.parse_line);
        if let Some(pattern) = &opts.pattern {
            let needle = pattern.to_lowercase();
            packages.retain(|p| p.name.to_lowercase().contains(&needle));
        }
        if opts.limit > 0 {
            packages.truncate(opts.limit);
        }
        Ok(packages)
    }

    async fn is_installed(&self, package: &str) -> bool {
        self.list_installed(&ListOptions::default())
            .await
            .map(|packages| packages.iter().any(|p| p.name.eq_ignore_ascii_case(package)))
            .unwrap_or(false)
    }

    async fn clean(&self, opts: &CleanOptions) -> Result<()> {
        let executor = self.executor_for(opts.dry_run);
        let args = if opts.all {
            self.spec.clean_all_args.unwrap_or(self.spec.clean_args)
        } else {
            self.spec.clean_args
        };
        self.run(&executor, args).await
    }

    async fn autoremove(&self) -> Result<()> {
        match self.spec.autoremove_args {
            Some(args) => self.run(&self.base.executor, args).await,
            None => Ok(()),
        }
    }
}

fn parse_lines(output: &str, source: &str, parse_line: fn(&str, &str) -> Option<Package>) -> Vec<Package> {
    output.lines().filter_map(|line| parse_line(line, source)).collect()
}

/// Parses `name<TAB>version` or `name version` pairs, the most common
/// shape among the CLI-driven backends (`dpkg -l`-derived tools excepted).
fn parse_name_version(line: &str, source: &str) -> Option<Package> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let mut parts = line.split_whitespace();
    let name = parts.next()?;
    let version = parts.next().unwrap_or("unknown");
    Some(Package {
        name: name.to_string(),
        version: version.to_string(),
        description: String::new(),
        source: source.to_string(),
        installed: true,
        size: None,
    })
}

/// Parses `brew list --versions` style `name version1 version2 ...` lines,
/// keeping only the newest (last) version token.
fn parse_brew_versions(line: &str, source: &str) -> Option<Package> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let mut parts = line.split_whitespace();
    let name = parts.next()?;
    let version = parts.last().unwrap_or("unknown").to_string();
    Some(Package {
        name: name.to_string(),
        version,
        description: String::new(),
        source: source.to_string(),
        installed: true,
        size: None,
    })
}

macro_rules! spec_const {
    ($ident:ident, $spec:expr) => {
        /// CLI argument spec.
        pub const $ident: CliSpec = $spec;
    };
}

spec_const!(
    APT_SPEC,
    CliSpec {
        install_flag: "install",
        uninstall_flag: "remove",
        purge_flag: Some("--purge"),
        yes_flag: Some("-y"),
        update_args: &["update"],
        upgrade_args: &["upgrade"],
        search_args: &["search"],
        list_args: &["list", "--installed"],
        info_args: &["show"],
        clean_args: &["autoclean"],
        clean_all_args: Some(&["clean"]),
        autoremove_args: Some(&["autoremove", "-y"]),
        needs_sudo: true,
        parse_line: |line, source| {
            let line = line.trim();
            let (head, _) = line.split_once('/')?;
            let mut rest = line.splitn(2, ' ');
            let _ = rest.next();
            let version = rest.next()?.split_whitespace().next()?;
            Some(Package {
                name: head.to_string(),
                version: version.to_string(),
                description: String::new(),
                source: source.to_string(),
                installed: line.contains("[installed"),
                size: None,
            })
        },
    }
);

spec_const!(
    DNF_SPEC,
    CliSpec {
        install_flag: "install",
        uninstall_flag: "remove",
        purge_flag: None,
        yes_flag: Some("-y"),
        update_args: &["check-update"],
        upgrade_args: &["upgrade"],
        search_args: &["search"],
        list_args: &["list", "installed"],
        info_args: &["info"],
        clean_args: &["clean", "expire-cache"],
        clean_all_args: Some(&["clean", "all"]),
        autoremove_args: Some(&["autoremove", "-y"]),
        needs_sudo: true,
        parse_line: parse_name_version,
    }
);

spec_const!(
    ZYPPER_SPEC,
    CliSpec {
        install_flag: "install",
        uninstall_flag: "remove",
        purge_flag: None,
        yes_flag: Some("-y"),
        update_args: &["refresh"],
        upgrade_args: &["update"],
        search_args: &["search"],
        list_args: &["search", "--installed-only"],
        info_args: &["info"],
        clean_args: &["clean"],
        clean_all_args: Some(&["clean", "--all"]),
        autoremove_args: None,
        needs_sudo: true,
        parse_line: parse_name_version,
    }
);

spec_const!(
    APK_SPEC,
    CliSpec {
        install_flag: "add",
        uninstall_flag: "del",
        purge_flag: None,
        yes_flag: None,
        update_args: &["update"],
        upgrade_args: &["upgrade"],
        search_args: &["search"],
        list_args: &["info"],
        info_args: &["info", "-a"],
        clean_args: &["cache", "clean"],
        clean_all_args: None,
        autoremove_args: None,
        needs_sudo: true,
        parse_line: parse_name_version,
    }
);

spec_const!(
    XBPS_SPEC,
    CliSpec {
        install_flag: "install",
        uninstall_flag: "remove",
        purge_flag: None,
        yes_flag: Some("-y"),
        update_args: &["install", "-Su"],
        upgrade_args: &["install", "-Su"],
        search_args: &["query", "-Rs"],
        list_args: &["query", "-l"],
        info_args: &["query"],
        clean_args: &["clean"],
        clean_all_args: None,
        autoremove_args: Some(&["remove", "-o", "-y"]),
        needs_sudo: true,
        parse_line: parse_name_version,
    }
);

spec_const!(
    EMERGE_SPEC,
    CliSpec {
        install_flag: "",
        uninstall_flag: "--unmerge",
        purge_flag: None,
        yes_flag: None,
        update_args: &["--sync"],
        upgrade_args: &["--update", "--deep", "--newuse", "@world"],
        search_args: &["--search"],
        list_args: &["--list"],
        info_args: &["--info"],
        clean_args: &["--depclean"],
        clean_all_args: None,
        autoremove_args: Some(&["--depclean"]),
        needs_sudo: true,
        parse_line: parse_name_version,
    }
);

spec_const!(
    EOPKG_SPEC,
    CliSpec {
        install_flag: "install",
        uninstall_flag: "remove",
        purge_flag: None,
        yes_flag: Some("-y"),
        update_args: &["update-repo"],
        upgrade_args: &["upgrade"],
        search_args: &["search"],
        list_args: &["list-installed"],
        info_args: &["info"],
        clean_args: &["delete-cache"],
        clean_all_args: None,
        autoremove_args: None,
        needs_sudo: true,
        parse_line: parse_name_version,
    }
);

spec_const!(
    NIXPKG_SPEC,
    CliSpec {
        install_flag: "profile install",
        uninstall_flag: "profile remove",
        purge_flag: None,
        yes_flag: None,
        update_args: &["flake", "update"],
        upgrade_args: &["profile", "upgrade", "--all"],
        search_args: &["search", "nixpkgs"],
        list_args: &["profile", "list"],
        info_args: &["eval"],
        clean_args: &["store", "gc"],
        clean_all_args: Some(&["store", "optimise"]),
        autoremove_args: None,
        needs_sudo: false,
        parse_line: parse_name_version,
    }
);

spec_const!(
    SLACKPKG_SPEC,
    CliSpec {
        install_flag: "install",
        uninstall_flag: "remove",
        purge_flag: None,
        yes_flag: Some("-default_answer=y"),
        update_args: &["update"],
        upgrade_args: &["upgrade-all"],
        search_args: &["search"],
        list_args: &["search", "-l"],
        info_args: &["info"],
        clean_args: &["clean-system"],
        clean_all_args: None,
        autoremove_args: None,
        needs_sudo: true,
        parse_line: parse_name_version,
    }
);

spec_const!(
    SWUPD_SPEC,
    CliSpec {
        install_flag: "bundle-add",
        uninstall_flag: "bundle-remove",
        purge_flag: None,
        yes_flag: None,
        update_args: &["update", "--download"],
        upgrade_args: &["update"],
        search_args: &["bundle-list", "--all"],
        list_args: &["bundle-list"],
        info_args: &["bundle-info"],
        clean_args: &["clean"],
        clean_all_args: Some(&["clean", "--all"]),
        autoremove_args: None,
        needs_sudo: true,
        parse_line: parse_name_version,
    }
);

spec_const!(
    BREW_SPEC,
    CliSpec {
        install_flag: "install",
        uninstall_flag: "uninstall",
        purge_flag: None,
        yes_flag: None,
        update_args: &["update"],
        upgrade_args: &["upgrade"],
        search_args: &["search"],
        list_args: &["list", "--versions"],
        info_args: &["info"],
        clean_args: &["cleanup"],
        clean_all_args: Some(&["cleanup", "-s"]),
        autoremove_args: Some(&["autoremove"]),
        needs_sudo: false,
        parse_line: parse_brew_versions,
    }
);

spec_const!(
    WINGET_SPEC,
    CliSpec {
        install_flag: "install",
        uninstall_flag: "uninstall",
        purge_flag: None,
        yes_flag: Some("--silent"),
        update_args: &["source", "update"],
        upgrade_args: &["upgrade", "--all"],
        search_args: &["search"],
        list_args: &["list"],
        info_args: &["show"],
        clean_args: &["source", "reset"],
        clean_all_args: None,
        autoremove_args: None,
        needs_sudo: false,
        parse_line: parse_name_version,
    }
);

spec_const!(
    CHOCOLATEY_SPEC,
    CliSpec {
        install_flag: "install",
        uninstall_flag: "uninstall",
        purge_flag: None,
        yes_flag: Some("-y"),
        update_args: &["outdated"],
        upgrade_args: &["upgrade", "all"],
        search_args: &["search"],
        list_args: &["list", "--local-only"],
        info_args: &["info"],
        clean_args: &["cache", "remove"],
        clean_all_args: None,
        autoremove_args: None,
        needs_sudo: true,
        parse_line: parse_name_version,
    }
);

spec_const!(
    SCOOP_SPEC,
    CliSpec {
        install_flag: "install",
        uninstall_flag: "uninstall",
        purge_flag: Some("--purge"),
        yes_flag: None,
        update_args: &["update"],
        upgrade_args: &["update", "*"],
        search_args: &["search"],
        list_args: &["list"],
        info_args: &["info"],
        clean_args: &["cache", "rm"],
        clean_all_args: Some(&["cache", "rm", "*"]),
        autoremove_args: None,
        needs_sudo: false,
        parse_line: parse_name_version,
    }
);

spec_const!(
    FLATPAK_SPEC,
    CliSpec {
        install_flag: "install",
        uninstall_flag: "uninstall",
        purge_flag: None,
        yes_flag: Some("-y"),
        update_args: &["update", "--appstream"],
        upgrade_args: &["update"],
        search_args: &["search"],
        list_args: &["list", "--app"],
        info_args: &["info"],
        clean_args: &["uninstall", "--unused"],
        clean_all_args: None,
        autoremove_args: Some(&["uninstall", "--unused", "-y"]),
        needs_sudo: false,
        parse_line: parse_name_version,
    }
);

spec_const!(
    SNAP_SPEC,
    CliSpec {
        install_flag: "install",
        uninstall_flag: "remove",
        purge_flag: Some("--purge"),
        yes_flag: None,
        update_args: &["refresh", "--list"],
        upgrade_args: &["refresh"],
        search_args: &["find"],
        list_args: &["list"],
        info_args: &["info"],
        clean_args: &["set", "system", "refresh.retain=2"],
        clean_all_args: None,
        autoremove_args: None,
        needs_sudo: true,
        parse_line: parse_name_version,
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_name_version_reads_first_two_columns() {
        let pkg = parse_name_version("ripgrep\t14.1.0", "dnf").expect("should parse");
        assert_eq!(pkg.name, "ripgrep");
        assert_eq!(pkg.version, "14.1.0");
    }

    #[test]
    fn parse_brew_versions_keeps_last_version() {
        let pkg = parse_brew_versions("python 3.11.6 3.12.1", "brew").expect("should parse");
        assert_eq!(pkg.version, "3.12.1");
    }

    #[test]
    fn apt_parse_line_detects_installed_marker() {
        let line = "ripgrep/jammy,now 14.1.0-1 amd64 [installed]";
        let pkg = (APT_SPEC.parse_line)(line, "apt").expect("should parse");
        assert_eq!(pkg.name, "ripgrep");
        assert!(pkg.installed);
    }
}
