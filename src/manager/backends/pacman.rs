//! The Arch Linux native backend, including the pacman-specific stderr
//! classifier that turns ad-hoc transaction failures into typed errors.

use crate::error::{PoxyError, Result};
use crate::exec::{CancelToken, Executor};
use crate::manager::pacman_error;
use crate::manager::{
    BaseManager, CleanOptions, InstallOptions, ListOptions, Manager, ManagerKind, Package,
    PackageInfo, SearchOptions, UninstallOptions, UpgradeOptions,
};
use async_trait::async_trait;

/// Arch Linux's native `pacman` backend.
#[derive(Debug)]
pub struct PacmanManager {
    base: BaseManager,
}

impl PacmanManager {
    /// Build a pacman adapter running commands through `executor`.
    #[must_use]
    pub fn new(executor: Executor) -> Self {
        Self {
            base: BaseManager::new("pacman", "Pacman", ManagerKind::Native, "pacman", true, executor),
        }
    }

    fn cancel() -> CancelToken {
        CancelToken::new()
    }

    /// Run `pacman args...` and classify a failure through the pacman error
    /// taxonomy rather than surfacing a generic execution failure.
    async fn run_classified(&self, cancel: &CancelToken, args: &[&str]) -> Result<()> {
        match self.base.executor.run_sudo_with_stderr(cancel, &self.base.binary(), args).await {
            Ok(_) => Ok(()),
            Err(PoxyError::BackendExecutionFailed { code, stderr }) => {
                Err(pacman_error::classify_or_generic(code, stderr))
            }
            Err(other) => Err(other),
        }
    }
}

#[async_trait]
impl Manager for PacmanManager {
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
        let executor = self.base.executor.with_dry_run(opts.dry_run);
        let mut args = vec!["-S"];
        if opts.auto_confirm {
            args.push("--noconfirm");
        }
        if !opts.reinstall {
            // pacman reinstalls already-installed packages by default; only
            // the --needed flag makes it skip them, so omit it when the
            // caller explicitly asked for a reinstall.
            args.push("--needed");
        }
        let refs: Vec<&str> = packages.iter().map(String::as_str).collect();
        args.extend(refs);
        let cancel = Self::cancel();
        match executor.run_sudo_with_stderr(&cancel, &self.base.binary(), &args).await {
            Ok(_) => Ok(()),
            Err(PoxyError::BackendExecutionFailed { code, stderr }) => {
                Err(pacman_error::classify_or_generic(code, stderr))
            }
            Err(other) => Err(other),
        }
    }

    async fn uninstall(&self, packages: &[String], opts: &UninstallOptions) -> Result<()> {
        let executor = self.base.executor.with_dry_run(opts.dry_run);
        let flag = if opts.recursive { "-Rs" } else { "-R" };
        let mut args = vec![flag];
        if opts.purge {
            args.push("-n");
        }
        if opts.auto_confirm {
            args.push("--noconfirm");
        }
        let refs: Vec<&str> = packages.iter().map(String::as_str).collect();
        args.extend(refs);
        let cancel = Self::cancel();
        match executor.run_sudo_with_stderr(&cancel, &self.base.binary(), &args).await {
            Ok(_) => Ok(()),
            Err(PoxyError::BackendExecutionFailed { code, stderr }) => {
                Err(pacman_error::classify_or_generic(code, stderr))
            }
            Err(other) => Err(other),
        }
    }

    async fn update(&self) -> Result<()> {
        self.run_classified(&Self::cancel(), &["-Sy"]).await
    }

    async fn upgrade(&self, opts: &UpgradeOptions) -> Result<()> {
        let executor = self.base.executor.with_dry_run(opts.dry_run);
        let mut args = vec!["-Syu"];
        if opts.auto_confirm {
            args.push("--noconfirm");
        }
        let refs: Vec<&str> = opts.packages.iter().map(String::as_str).collect();
        args.extend(refs);
        let cancel = Self::cancel();
        match executor.run_sudo_with_stderr(&cancel, &self.base.binary(), &args).await {
            Ok(_) => Ok(()),
            Err(PoxyError::BackendExecutionFailed { code, stderr }) => {
                Err(pacman_error::classify_or_generic(code, stderr))
            }
            Err(other) => Err(other),
        }
    }

    async fn search(&self, query: &str, opts: &SearchOptions) -> Result<Vec<Package>> {
        let cancel = Self::cancel();
        let flag = if opts.installed_only { "-Qs" } else { "-Ss" };
        let out = self
            .base
            .executor
            .output_quiet(&cancel, &self.base.binary(), &[flag, query])
            .await
            .unwrap_or_default();
        let mut packages = parse_ss_output(&out, self.name());
        if opts.exact_match {
            packages.retain(|p| p.name.eq_ignore_ascii_case(query));
        }
        if opts.limit > 0 {
            packages.truncate(opts.limit);
        }
        Ok(packages)
    }

    async fn info(&self, package: &str) -> Result<PackageInfo> {
        let cancel = Self::cancel();
        let binary = self.base.binary();
        let out = match self.base.executor.output_quiet(&cancel, &binary, &["-Qi", package]).await {
            Ok(out) => out,
            Err(_) => self
                .base
                .executor
                .output_quiet(&cancel, &binary, &["-Si", package])
                .await
                .map_err(|_| PoxyError::PackageNotFound(package.to_string()))?,
        };
        parse_qi_output(&out, self.name()).ok_or_else(|| PoxyError::PackageNotFound(package.to_string()))
    }

    async fn list_installed(&self, opts: &ListOptions) -> Result<Vec<Package>> {
        let cancel = Self::cancel();
        let out = self
            .base
            .executor
            .output_quiet(&cancel, &self.base.binary(), &["-Q"])
            .await
            .unwrap_or_default();
        let mut packages = parse_q_output(&out, self.name());
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
        let cancel = Self::cancel();
        self.base
            .executor
            .output_quiet(&cancel, &self.base.binary(), &["-Q", package])
            .await
            .is_ok()
    }

    async fn clean(&self, opts: &CleanOptions) -> Result<()> {
        let executor = self.base.executor.with_dry_run(opts.dry_run);
        let args: &[&str] = if opts.all { &["-Scc", "--noconfirm"] } else { &["-Sc", "--noconfirm"] };
        let cancel = Self::cancel();
        self.run_classified_with(&executor, &cancel, args).await
    }

    async fn autoremove(&self) -> Result<()> {
        let cancel = Self::cancel();
        let orphans = self
            .base
            .executor
            .output_quiet(&cancel, &self.base.binary(), &["-Qdtq"])
            .await
            .unwrap_or_default();
        let names: Vec<&str> = orphans.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        if names.is_empty() {
            return Ok(());
        }
        let mut args = vec!["-Rs", "--noconfirm"];
        args.extend(names);
        self.run_classified(&cancel, &args).await
    }
}

impl PacmanManager {
    async fn run_classified_with(&self, executor: &Executor, cancel: &CancelToken, args: &[&str]) -> Result<()> {
        match executor.run_sudo_with_stderr(cancel, &self.base.binary(), args).await {
            Ok(_) => Ok(()),
            Err(PoxyError::BackendExecutionFailed { code, stderr }) => {
                Err(pacman_error::classify_or_generic(code, stderr))
            }
            Err(other) => Err(other),
        }
    }
}

/// Parse `pacman -Ss`/`-Qs` output: repository/name/version header line,
/// then an indented description line.
fn parse_ss_output(output: &str, source: &str) -> Vec<Package> {
    let mut packages = Vec::new();
    let mut lines = output.lines().peekable();
    while let Some(header) = lines.next() {
        if header.starts_with(' ') || header.is_empty() {
            continue;
        }
        let mut parts = header.split_whitespace();
        let Some(repo_name) = parts.next() else { continue };
        let Some(version) = parts.next() else { continue };
        let name = repo_name.split('/').next_back().unwrap_or(repo_name);
        let installed = header.contains("[installed]");
        let description = lines
            .next_if(|l| l.starts_with(' '))
            .map(|l| l.trim().to_string())
            .unwrap_or_default();
        packages.push(Package {
            name: name.to_string(),
            version: version.to_string(),
            description,
            source: source.to_string(),
            installed,
            size: None,
        });
    }
    packages
}

/// Parse `pacman -Q` output: one `name version` pair per line.
fn parse_q_output(output: &str, source: &str) -> Vec<Package> {
    output
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let name = parts.next()?;
            let version = parts.next()?;
            Some(Package {
                name: name.to_string(),
                version: version.to_string(),
                description: String::new(),
                source: source.to_string(),
                installed: true,
                size: None,
            })
        })
        .collect()
}

/// Parse `pacman -Qi`/`-Si` field-colon-value block output into a single
/// [`PackageInfo`].
fn parse_qi_output(output: &str, source: &str) -> Option<PackageInfo> {
    let mut fields = std::collections::HashMap::new();
    for line in output.lines() {
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim();
            let value = value.trim();
            if !key.is_empty() && key.chars().next().is_some_and(char::is_uppercase) {
                fields.insert(key.to_string(), value.to_string());
            }
        }
    }
    let name = fields.get("Name")?.clone();
    let version = fields.get("Version").cloned().unwrap_or_default();
    let description = fields.get("Description").cloned().unwrap_or_default();
    let dependencies = fields
        .get("Depends On")
        .map(|s| s.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();
    Some(PackageInfo {
        package: Package {
            name,
            version,
            description,
            source: source.to_string(),
            installed: true,
            size: None,
        },
        repository: fields.get("Repository").cloned().unwrap_or_default(),
        maintainer: fields.get("Packager").cloned().unwrap_or_default(),
        license: fields.get("Licenses").cloned().unwrap_or_default(),
        url: fields.get("URL").cloned().unwrap_or_default(),
        dependencies,
        install_timestamp: fields.get("Install Date").cloned(),
    })
}
