//! Backend registration, system detection, and priority-ordered, fanned-out
//! multi-source search.

use crate::error::{PoxyError, Result};
use crate::manager::{Manager, ManagerKind, Package, SearchOptions};
use crate::types::system::{Os, SystemInfo};
use futures::future::join_all;
use std::collections::HashMap;

/// Helper CLIs that resolve to the native AUR backend by convention, even
/// though poxy-core does not shell out to any of them.
const AUR_HELPER_ALIASES: &[&str] = &["yay", "paru", "trizen", "aurman"];

/// Distribution IDs (and `ID_LIKE` members) mapped to their native backend
/// name, consulted in order so a more specific match can win.
const LINUX_DISTRO_TABLE: &[(&str, &str)] = &[
    ("arch", "pacman"),
    ("manjaro", "pacman"),
    ("endeavouros", "pacman"),
    ("debian", "apt"),
    ("ubuntu", "apt"),
    ("linuxmint", "apt"),
    ("pop", "apt"),
    ("fedora", "dnf"),
    ("rhel", "dnf"),
    ("centos", "dnf"),
    ("rocky", "dnf"),
    ("almalinux", "dnf"),
    ("opensuse", "zypper"),
    ("opensuse-leap", "zypper"),
    ("opensuse-tumbleweed", "zypper"),
    ("alpine", "apk"),
    ("void", "xbps"),
    ("gentoo", "emerge"),
    ("solus", "eopkg"),
    ("nixos", "nixpkg"),
    ("slackware", "slackpkg"),
    ("clear-linux-os", "swupd"),
];

/// Source-priority configuration consulted by [`Registry::available`] and
/// [`Registry::search_all`].
#[derive(Clone, Debug, Default)]
pub struct RegistryConfig {
    /// Ordered list of source identifiers (backend names or `native`/`universal`/`aur`).
    pub source_priority: Vec<String>,
}

/// What: Owns every registered backend, the detected [`SystemInfo`], and the
/// source-priority configuration used to order multi-source results.
///
/// Inputs: None (constructed via `Registry::new` or `Registry::detect`)
///
/// Output: `Registry` instance ready for lookup/search
///
/// Details:
/// - Holds backends in a `HashMap` keyed by their own `name()`, plus a
///   separate insertion-order `Vec` so iteration order is deterministic
/// - `native_candidates` is populated by `detect_system` and consulted by
///   `native()`
pub struct Registry {
    backends: HashMap<String, Box<dyn Manager>>,
    insertion_order: Vec<String>,
    system_info: Option<SystemInfo>,
    native_candidates: Vec<String>,
    config: RegistryConfig,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl Registry {
    /// What: Build an empty registry with no backends registered yet.
    ///
    /// Inputs:
    /// - `config`: source-priority configuration to order results by
    ///
    /// Output:
    /// - `Registry` with no backends and no detected system info
    #[must_use]
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            backends: HashMap::new(),
            insertion_order: Vec::new(),
            system_info: None,
            native_candidates: Vec::new(),
            config,
        }
    }

    /// What: Build a registry pre-populated with every backend the facade
    /// knows about, then run system detection.
    ///
    /// Inputs: None
    ///
    /// Output:
    /// - `Registry` with every backend registered and [`Registry::native`]
    ///   candidates resolved for the current system
    #[must_use]
    pub fn detect() -> Self {
        let mut registry = Self::default();
        for backend in crate::manager::backends::all_backends(crate::exec::Executor::new()) {
            registry.register(backend);
        }
        registry.detect_system();
        registry
    }

    /// Register a backend; a second registration under the same name
    /// replaces the first (last write wins).
    pub fn register(&mut self, manager: Box<dyn Manager>) {
        let name = manager.name().to_string();
        if !self.backends.contains_key(&name) {
            self.insertion_order.push(name.clone());
        }
        self.backends.insert(name, manager);
    }

    /// Detect [`SystemInfo`] and pick the native manager candidates for this system.
    pub fn detect_system(&mut self) {
        let info = detect_system_info();
        self.native_candidates = native_backend_candidates(&info);
        self.system_info = Some(info);
    }

    /// Look up a backend by its own registered name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Manager> {
        self.backends.get(name).map(std::convert::AsRef::as_ref)
    }

    /// The detected native manager: the first OS-rule candidate that is
    /// both registered and currently available.
    pub async fn native(&self) -> Option<&dyn Manager> {
        for name in &self.native_candidates {
            if let Some(manager) = self.backends.get(name) {
                if manager.is_available().await {
                    return Some(manager.as_ref());
                }
            }
        }
        None
    }

    /// The detected system identity, if [`Registry::detect_system`] has run.
    #[must_use]
    pub const fn system_info(&self) -> Option<&SystemInfo> {
        self.system_info.as_ref()
    }

    /// All registered backends whose binary is on PATH, stably sorted by
    /// configured priority.
    pub async fn available(&self) -> Vec<&dyn Manager> {
        let mut candidates = Vec::new();
        for name in &self.insertion_order {
            let Some(manager) = self.backends.get(name) else { continue };
            if manager.is_available().await {
                candidates.push(manager.as_ref());
            }
        }
        candidates.sort_by_key(|manager| self.priority_of(manager));
        candidates
    }

    /// [`Registry::available`] filtered to one [`ManagerKind`].
    pub async fn available_by_type(&self, kind: ManagerKind) -> Vec<&dyn Manager> {
        self.available().await.into_iter().filter(|m| m.manager_type() == kind).collect()
    }

    /// What: Resolve a source string to exactly one backend.
    ///
    /// Inputs:
    /// - `source`: the backend's own registered name, a kind alias
    ///   (`native`/`universal`/`aur`), or an AUR-helper alias
    ///   (`yay`/`paru`/`trizen`/`aurman`)
    ///
    /// Output:
    /// - `Result<&dyn Manager>` with the resolved, available backend
    ///
    /// # Errors
    /// Returns [`PoxyError::UnknownSource`] if `source` resolves to nothing,
    /// or [`PoxyError::SourceUnavailable`] if the resolved backend's binary
    /// is not on PATH.
    pub async fn get_manager_for_source(&self, source: &str) -> Result<&dyn Manager> {
        let manager = if let Some(manager) = self.backends.get(source) {
            manager.as_ref()
        } else if source == "native" {
            self.native().await.ok_or_else(|| PoxyError::UnknownSource(source.to_string()))?
        } else if source == "universal" {
            self.first_of_kind(ManagerKind::Universal)
                .ok_or_else(|| PoxyError::UnknownSource(source.to_string()))?
        } else if source == "aur" || AUR_HELPER_ALIASES.contains(&source) {
            self.backends.get("aur").map(std::convert::AsRef::as_ref).ok_or_else(|| {
                PoxyError::UnknownSource(source.to_string())
            })?
        } else {
            return Err(PoxyError::UnknownSource(source.to_string()));
        };

        if manager.is_available().await {
            Ok(manager)
        } else {
            Err(PoxyError::SourceUnavailable(manager.name().to_string()))
        }
    }

    fn first_of_kind(&self, kind: ManagerKind) -> Option<&dyn Manager> {
        self.insertion_order
            .iter()
            .filter_map(|name| self.backends.get(name))
            .find(|manager| manager.manager_type() == kind)
            .map(std::convert::AsRef::as_ref)
    }

    /// What: Fan `search` out concurrently across all available backends.
    ///
    /// Inputs:
    /// - `query`: search string passed to every backend
    /// - `opts`: search-time options passed to every backend
    ///
    /// Output:
    /// - `(Vec<Package>, Option<PoxyError>)`: aggregated results sorted by
    ///   source priority then package name, plus the first per-backend
    ///   error encountered (if any)
    ///
    /// Details:
    /// - Later errors are swallowed so one failing backend doesn't hide the
    ///   rest
    pub async fn search_all(&self, query: &str, opts: &SearchOptions) -> (Vec<Package>, Option<PoxyError>) {
        let backends = self.available().await;
        let futures = backends.iter().map(|manager| {
            let query = query.to_string();
            async move { (manager.name().to_string(), manager.search(&query, opts).await) }
        });
        let outcomes = join_all(futures).await;

        let mut results = Vec::new();
        let mut first_error = None;
        for (name, outcome) in outcomes {
            match outcome {
                Ok(packages) => results.extend(packages),
                Err(err) => {
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                    tracing::debug!(backend = %name, "search_all: backend failed, continuing");
                }
            }
        }

        results.sort_by(|a, b| {
            let pa = self.priority_by_name(&a.source);
            let pb = self.priority_by_name(&b.source);
            pa.cmp(&pb).then_with(|| a.name.cmp(&b.name))
        });
        (results, first_error)
    }

    /// A backend's priority is the index of its own name in the configured
    /// list; failing that, the index of its kind keyword; failing that, a
    /// sentinel larger than any configured index.
    fn priority_of(&self, manager: &dyn Manager) -> usize {
        self.config
            .source_priority
            .iter()
            .position(|s| s == manager.name())
            .or_else(|| self.config.source_priority.iter().position(|s| s == manager.manager_type().alias()))
            .unwrap_or(usize::MAX)
    }

    fn priority_by_name(&self, name: &str) -> usize {
        self.config
            .source_priority
            .iter()
            .position(|s| s == name)
            .or_else(|| {
                self.backends
                    .get(name)
                    .and_then(|m| self.config.source_priority.iter().position(|s| s == m.manager_type().alias()))
            })
            .unwrap_or(usize::MAX)
    }
}

/// Read `/etc/os-release`-shaped detection into [`SystemInfo`]; non-Linux
/// platforms fill in only `os` and `arch`.
fn detect_system_info() -> SystemInfo {
    let arch = std::env::consts::ARCH.to_string();
    match std::env::consts::OS {
        "linux" => {
            let (distribution, distro_family, version_id, pretty_name) = parse_os_release();
            SystemInfo { os: Os::Linux, arch, distribution, distro_family, version_id, pretty_name }
        }
        "macos" => SystemInfo {
            os: Os::Darwin,
            arch,
            distribution: String::new(),
            distro_family: Vec::new(),
            version_id: String::new(),
            pretty_name: "macOS".to_string(),
        },
        "windows" => SystemInfo {
            os: Os::Windows,
            arch,
            distribution: String::new(),
            distro_family: Vec::new(),
            version_id: String::new(),
            pretty_name: "Windows".to_string(),
        },
        _ => SystemInfo {
            os: Os::Unknown,
            arch,
            distribution: String::new(),
            distro_family: Vec::new(),
            version_id: String::new(),
            pretty_name: String::new(),
        },
    }
}

fn parse_os_release() -> (String, Vec<String>, String, String) {
    let Ok(content) = std::fs::read_to_string("/etc/os-release") else {
        return (String::new(), Vec::new(), String::new(), String::new());
    };
    parse_os_release_content(&content)
}

fn parse_os_release_content(content: &str) -> (String, Vec<String>, String, String) {
    let mut id = String::new();
    let mut id_like = Vec::new();
    let mut version_id = String::new();
    let mut pretty_name = String::new();
    for line in content.lines() {
        let Some((key, value)) = line.split_once('=') else { continue };
        let value = value.trim().trim_matches('"').to_string();
        match key {
            "ID" => id = value,
            "ID_LIKE" => id_like = value.split_whitespace().map(str::to_string).collect(),
            "VERSION_ID" => version_id = value,
            "PRETTY_NAME" => pretty_name = value,
            _ => {}
        }
    }
    let mut distro_family = vec![id.clone()];
    distro_family.extend(id_like);
    (id, distro_family, version_id, pretty_name)
}

/// Candidate native backend names per OS rules, in preference order; the
/// caller still must check each candidate is registered and available
/// before exposing one.
fn native_backend_candidates(info: &SystemInfo) -> Vec<String> {
    match info.os {
        Os::Linux => LINUX_DISTRO_TABLE
            .iter()
            .find(|(distro, _)| info.matches_family(distro))
            .map(|(_, manager)| vec![(*manager).to_string()])
            .unwrap_or_default(),
        Os::Darwin => vec!["brew".to_string()],
        Os::Windows => vec!["winget".to_string(), "chocolatey".to_string(), "scoop".to_string()],
        Os::Unknown => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_os_release_with_id_like_chain() {
        let content = "ID=manjaro\nID_LIKE=arch\nVERSION_ID=23.0\nPRETTY_NAME=\"Manjaro Linux\"\n";
        let (id, family, version, pretty) = parse_os_release_content(content);
        assert_eq!(id, "manjaro");
        assert_eq!(family, vec!["manjaro", "arch"]);
        assert_eq!(version, "23.0");
        assert_eq!(pretty, "Manjaro Linux");
    }

    #[test]
    fn native_backend_prefers_id_like_match() {
        let info = SystemInfo {
            os: Os::Linux,
            arch: "x86_64".to_string(),
            distribution: "endeavouros".to_string(),
            distro_family: vec!["endeavouros".to_string(), "arch".to_string()],
            version_id: String::new(),
            pretty_name: String::new(),
        };
        assert_eq!(native_backend_candidates(&info), vec!["pacman".to_string()]);
    }

    #[test]
    fn darwin_always_resolves_to_brew() {
        let info = SystemInfo {
            os: Os::Darwin,
            arch: "aarch64".to_string(),
            distribution: String::new(),
            distro_family: Vec::new(),
            version_id: String::new(),
            pretty_name: "macOS".to_string(),
        };
        assert_eq!(native_backend_candidates(&info), vec!["brew".to_string()]);
    }

    #[test]
    fn windows_candidates_are_priority_ordered() {
        let info = SystemInfo {
            os: Os::Windows,
            arch: "x86_64".to_string(),
            distribution: String::new(),
            distro_family: Vec::new(),
            version_id: String::new(),
            pretty_name: "Windows".to_string(),
        };
        assert_eq!(
            native_backend_candidates(&info),
            vec!["winget".to_string(), "chocolatey".to_string(), "scoop".to_string()]
        );
    }

    use crate::manager::{CleanOptions, InstallOptions, ListOptions, PackageInfo, UninstallOptions, UpgradeOptions};
    use async_trait::async_trait;

    #[derive(Debug)]
    struct StubManager {
        name: &'static str,
        kind: ManagerKind,
        packages: Vec<&'static str>,
    }

    #[async_trait]
    impl Manager for StubManager {
        fn name(&self) -> &str {
            self.name
        }
        fn display_name(&self) -> &str {
            self.name
        }
        fn manager_type(&self) -> ManagerKind {
            self.kind
        }
        async fn is_available(&self) -> bool {
            true
        }
        fn needs_sudo(&self) -> bool {
            false
        }
        async fn install(&self, _: &[String], _: &InstallOptions) -> Result<()> {
            Ok(())
        }
        async fn uninstall(&self, _: &[String], _: &UninstallOptions) -> Result<()> {
            Ok(())
        }
        async fn update(&self) -> Result<()> {
            Ok(())
        }
        async fn upgrade(&self, _: &UpgradeOptions) -> Result<()> {
            Ok(())
        }
        async fn search(&self, _: &str, _: &SearchOptions) -> Result<Vec<Package>> {
            Ok(self
                .packages
                .iter()
                .map(|name| Package {
                    name: (*name).to_string(),
                    version: "1.0".to_string(),
                    description: String::new(),
                    source: self.name.to_string(),
                    installed: false,
                    size: None,
                })
                .collect())
        }
        async fn info(&self, package: &str) -> Result<PackageInfo> {
            Err(PoxyError::PackageNotFound(package.to_string()))
        }
        async fn list_installed(&self, _: &ListOptions) -> Result<Vec<Package>> {
            Ok(Vec::new())
        }
        async fn is_installed(&self, _: &str) -> bool {
            false
        }
        async fn clean(&self, _: &CleanOptions) -> Result<()> {
            Ok(())
        }
        async fn autoremove(&self) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn search_all_sorts_by_configured_priority_then_name() {
        let mut registry = Registry::new(RegistryConfig { source_priority: vec!["zebra".to_string(), "alpha".to_string()] });
        registry.register(Box::new(StubManager { name: "alpha", kind: ManagerKind::Native, packages: vec!["bravo", "alfa"] }));
        registry.register(Box::new(StubManager { name: "zebra", kind: ManagerKind::Universal, packages: vec!["zulu"] }));

        let (results, error) = registry.search_all("anything", &SearchOptions::default()).await;
        assert!(error.is_none());
        let sources: Vec<&str> = results.iter().map(|p| p.source.as_str()).collect();
        assert_eq!(sources, vec!["zebra", "alpha", "alpha"]);
        assert_eq!(results[1].name, "alfa");
        assert_eq!(results[2].name, "bravo");
    }

    #[tokio::test]
    async fn get_manager_for_source_resolves_aur_helper_aliases() {
        let mut registry = Registry::default();
        registry.register(Box::new(StubManager { name: "aur", kind: ManagerKind::Aur, packages: vec![] }));
        let manager = registry.get_manager_for_source("yay").await.expect("alias should resolve");
        assert_eq!(manager.name(), "aur");
    }

    #[tokio::test]
    async fn get_manager_for_source_rejects_unknown() {
        let registry = Registry::default();
        let err = registry.get_manager_for_source("nonexistent").await.expect_err("should fail");
        assert!(matches!(err, PoxyError::UnknownSource(_)));
    }
}
