//! Shared option/identity types for the Manager abstraction.

use serde::{Deserialize, Serialize};

/// Kind of backend a [`crate::manager::Manager`] implements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ManagerKind {
    /// The OS/distribution's default package manager (apt, pacman, dnf, ...).
    Native,
    /// A cross-distribution manager (flatpak, snap).
    Universal,
    /// The native Arch User Repository pipeline.
    Aur,
}

impl ManagerKind {
    /// The alias this kind resolves from in `Registry::get_manager_for_source`.
    #[must_use]
    pub const fn alias(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Universal => "universal",
            Self::Aur => "aur",
        }
    }
}

impl std::fmt::Display for ManagerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.alias())
    }
}

/// Options for `Manager::install`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InstallOptions {
    /// Skip interactive confirmation prompts.
    pub auto_confirm: bool,
    /// Print what would run without executing it.
    pub dry_run: bool,
    /// Reinstall even if already present at the requested version.
    pub reinstall: bool,
}

/// Options for `Manager::uninstall`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UninstallOptions {
    /// Skip interactive confirmation prompts.
    pub auto_confirm: bool,
    /// Print what would run without executing it.
    pub dry_run: bool,
    /// Remove configuration files along with the package.
    pub purge: bool,
    /// Run `autoremove` afterward when the backend supports it.
    pub recursive: bool,
}

/// Options for `Manager::upgrade`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpgradeOptions {
    /// Skip interactive confirmation prompts.
    pub auto_confirm: bool,
    /// Print what would run without executing it.
    pub dry_run: bool,
    /// Packages to upgrade; empty means upgrade everything.
    pub packages: Vec<String>,
}

/// Options for `Manager::search`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Maximum number of results; `0` means unlimited.
    pub limit: usize,
    /// Only return packages that are already installed.
    pub installed_only: bool,
    /// Also match the query against package descriptions.
    pub search_in_desc: bool,
    /// Require an exact name match rather than substring matching.
    pub exact_match: bool,
}

/// Options for `Manager::list_installed`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Maximum number of results; `0` means unlimited.
    pub limit: usize,
    /// Only return packages that are already installed (kept for symmetry with `SearchOptions`).
    pub installed_only: bool,
    /// Only return packages with a pending upgrade.
    pub upgradable: bool,
    /// Case-insensitive substring filter over package names.
    pub pattern: Option<String>,
}

/// Options for `Manager::clean`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CleanOptions {
    /// Print what would run without executing it.
    pub dry_run: bool,
    /// Scrub the entire cache rather than only stale entries.
    pub all: bool,
}
