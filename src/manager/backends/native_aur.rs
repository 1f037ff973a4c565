//! Adapts the native AUR [`crate::aur::builder::Builder`] pipeline to the
//! uniform [`Manager`] contract, falling back to `pacman` for everything the
//! RPC client cannot answer (installed-package state lives in pacman's
//! local database, not on the AUR).

use crate::aur::builder::{BuildOptions, Builder};
use crate::client::AurRpcClient;
use crate::error::{PoxyError, Result};
use crate::exec::CancelToken;
use crate::manager::{
    BaseManager, CleanOptions, InstallOptions, ListOptions, Manager, ManagerKind, Package,
    PackageInfo, SearchOptions, UninstallOptions, UpgradeOptions,
};
use async_trait::async_trait;
use std::path::PathBuf;

/// The native Arch User Repository backend: no `yay`/`paru` dependency.
#[derive(Debug)]
pub struct NativeAurManager {
    base: BaseManager,
    cache_dir: PathBuf,
}

impl NativeAurManager {
    /// Build an AUR adapter running commands through `executor`.
    #[must_use]
    pub fn new(executor: crate::exec::Executor) -> Self {
        Self {
            base: BaseManager::new("aur", "Arch User Repository", ManagerKind::Aur, "makepkg", false, executor),
            cache_dir: dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("poxy-core")
                .join("aur-build"),
        }
    }

    fn client(&self) -> Result<AurRpcClient> {
        AurRpcClient::new()
    }
}

#[async_trait]
impl Manager for NativeAurManager {
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
        ["git", "makepkg", "pacman"].iter().all(|bin| which::which(bin).is_ok())
    }

    fn needs_sudo(&self) -> bool {
        self.base.needs_sudo()
    }

    async fn install(&self, packages: &[String], opts: &InstallOptions) -> Result<()> {
        let client = self.client()?;
        let builder = Builder::new(self.base.executor);
        for package in packages {
            let build_opts = BuildOptions {
                cache_dir: self.cache_dir.clone(),
                review_pkgbuild: !opts.auto_confirm,
                on_review: None,
                use_sandbox: true,
                auto_confirm: opts.auto_confirm,
            };
            builder.build_and_install(&client, package, &build_opts).await?;
        }
        Ok(())
    }

    async fn uninstall(&self, packages: &[String], opts: &UninstallOptions) -> Result<()> {
        let cancel = CancelToken::new();
        let flag = if opts.recursive { "-Rs" } else { "-R" };
        let mut args = vec![flag];
        if opts.auto_confirm {
            args.push("--noconfirm");
        }
        let refs: Vec<&str> = packages.iter().map(String::as_str).collect();
        args.extend(refs);
        self.base.executor.with_dry_run(opts.dry_run).run_sudo(&cancel, "pacman", &args).await
    }

    async fn update(&self) -> Result<()> {
        Ok(())
    }

    async fn upgrade(&self, opts: &UpgradeOptions) -> Result<()> {
        let cancel = CancelToken::new();
        let mut args = vec!["-Syu"];
        if opts.auto_confirm {
            args.push("--noconfirm");
        }
        self.base.executor.with_dry_run(opts.dry_run).run_sudo(&cancel, "pacman", &args).await
    }

    async fn search(&self, query: &str, opts: &SearchOptions) -> Result<Vec<Package>> {
        if opts.installed_only {
            return self.list_installed(&ListOptions { pattern: Some(query.to_string()), ..ListOptions::default() }).await;
        }
        let client = self.client()?;
        let results = client.aur().search(query).await?;
        let mut packages: Vec<Package> = results
            .into_iter()
            .map(|pkg| Package {
                name: pkg.name,
                version: pkg.version,
                description: pkg.description,
                source: "aur".to_string(),
                installed: false,
                size: None,
            })
            .collect();
        if opts.exact_match {
            packages.retain(|p| p.name.eq_ignore_ascii_case(query));
        }
        if opts.limit > 0 {
            packages.truncate(opts.limit);
        }
        Ok(packages)
    }

    async fn info(&self, package: &str) -> Result<PackageInfo> {
        if let Ok(client) = self.client() {
            if let Ok(mut details) = client.aur().info(&[package]).await {
                if !details.is_empty() {
                    let d = details.remove(0);
                    return Ok(PackageInfo {
                        package: Package {
                            name: d.name,
                            version: d.version,
                            description: d.description,
                            source: "aur".to_string(),
                            installed: false,
                            size: None,
                        },
                        repository: "aur".to_string(),
                        maintainer: d.maintainer.unwrap_or_default(),
                        license: d.licenses.join(", "),
                        url: d.url,
                        dependencies: d.all_dependencies(),
                        install_timestamp: None,
                    });
                }
            }
        }
        let cancel = CancelToken::new();
        let out = self
            .base
            .executor
            .output_quiet(&cancel, "pacman", &["-Qi", package])
            .await
            .map_err(|_| PoxyError::PackageNotFound(package.to_string()))?;
        let found = parse_pacman_qi(&out, package).ok_or_else(|| PoxyError::PackageNotFound(package.to_string()))?;
        Ok(PackageInfo {
            package: found,
            repository: "aur".to_string(),
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
            .output_quiet(&cancel, "pacman", &["-Qm"])
            .await
            .unwrap_or_default();
        let mut packages: Vec<Package> = out
            .lines()
            .filter_map(|line| {
                let mut parts = line.split_whitespace();
                let name = parts.next()?;
                let version = parts.next()?;
                Some(Package {
                    name: name.to_string(),
                    version: version.to_string(),
                    description: String::new(),
                    source: "aur".to_string(),
                    installed: true,
                    size: None,
                })
            })
            .collect();
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
        let cancel = CancelToken::new();
        self.base.executor.output_quiet(&cancel, "pacman", &["-Q", package]).await.is_ok()
    }

    async fn clean(&self, opts: &CleanOptions) -> Result<()> {
        if opts.all && self.cache_dir.exists() {
            if opts.dry_run {
                println!("[dry-run] Would remove {}", self.cache_dir.display());
            } else {
                tokio::fs::remove_dir_all(&self.cache_dir).await?;
            }
        }
        Ok(())
    }

    async fn autoremove(&self) -> Result<()> {
        let cancel = CancelToken::new();
        let orphans = self
            .base
            .executor
            .output_quiet(&cancel, "pacman", &["-Qdtq"])
            .await
            .unwrap_or_default();
        let names: Vec<&str> = orphans.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        if names.is_empty() {
            return Ok(());
        }
        let mut args = vec!["-Rs", "--noconfirm"];
        args.extend(names);
        self.base.executor.run_sudo(&cancel, "pacman", &args).await
    }
}

fn parse_pacman_qi(output: &str, fallback_name: &str) -> Option<Package> {
    let mut name = fallback_name.to_string();
    let mut version = String::new();
    let mut description = String::new();
    for line in output.lines() {
        if let Some((key, value)) = line.split_once(':') {
            match key.trim() {
                "Name" => name = value.trim().to_string(),
                "Version" => version = value.trim().to_string(),
                "Description" => description = value.trim().to_string(),
                _ => {}
            }
        }
    }
    if version.is_empty() {
        return None;
    }
    Some(Package { name, version, description, source: "aur".to_string(), installed: true, size: None })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_pacman_qi_block() {
        let out = "Name            : yay\nVersion         : 12.3.5-1\nDescription     : AUR helper\n";
        let pkg = parse_pacman_qi(out, "yay").expect("should parse");
        assert_eq!(pkg.version, "12.3.5-1");
    }
}
