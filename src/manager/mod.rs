//! The uniform Manager contract every package-manager backend implements,
//! plus the shared [`BaseManager`] state every adapter embeds.

pub mod backends;
pub mod pacman_error;

pub use crate::types::manager::{
    CleanOptions, InstallOptions, ListOptions, ManagerKind, SearchOptions, UninstallOptions,
    UpgradeOptions,
};
pub use crate::types::package::{Package, PackageInfo};

use crate::error::Result;
use crate::exec::Executor;
use async_trait::async_trait;
use std::sync::Mutex;

/// What: Trait for the operations every backend adapter implements uniformly.
///
/// Inputs: None (trait definition)
///
/// Output: Trait that defines the interface every package-manager backend
/// conforms to.
///
/// Details:
/// - Each method maps onto one specific backend CLI; adapters are
///   responsible for parsing that CLI's ad-hoc textual output into the
///   shared data model
/// - Implemented by the `pacman`/generic-universal/native-AUR adapters in
///   `backends/`
#[async_trait]
pub trait Manager: Send + Sync {
    /// Stable identifier (e.g. `"pacman"`, `"apt"`, `"aur"`).
    fn name(&self) -> &str;

    /// Human-facing label (e.g. `"Pacman"`, `"Advanced Package Tool"`).
    fn display_name(&self) -> &str;

    /// Whether this backend is Native, Universal, or the AUR pipeline.
    fn manager_type(&self) -> ManagerKind;

    /// Whether this backend's binary exists on PATH right now.
    async fn is_available(&self) -> bool;

    /// Whether mutating operations on this backend require elevation.
    fn needs_sudo(&self) -> bool;

    /// What: Install one or more packages.
    ///
    /// Inputs:
    /// - `packages`: package names to install
    /// - `opts`: install-time options (e.g. no-confirm, reinstall)
    ///
    /// Output:
    /// - `Result<()>`, `Err` if the backend's install command fails
    ///
    /// # Errors
    /// Returns a typed error if the backend's install command fails.
    async fn install(&self, packages: &[String], opts: &InstallOptions) -> Result<()>;

    /// What: Uninstall one or more packages.
    ///
    /// Inputs:
    /// - `packages`: package names to remove
    /// - `opts`: uninstall-time options (e.g. purge config files)
    ///
    /// Output:
    /// - `Result<()>`, `Err` if the backend's removal command fails
    ///
    /// # Errors
    /// Returns a typed error if the backend's removal command fails.
    async fn uninstall(&self, packages: &[String], opts: &UninstallOptions) -> Result<()>;

    /// Refresh this backend's package metadata (no package changes).
    ///
    /// # Errors
    /// Returns a typed error if the refresh command fails.
    async fn update(&self) -> Result<()>;

    /// Upgrade packages; an empty list means upgrade everything.
    ///
    /// # Errors
    /// Returns a typed error if the backend's upgrade command fails.
    async fn upgrade(&self, opts: &UpgradeOptions) -> Result<()>;

    /// What: Search this backend for packages matching `query`.
    ///
    /// Inputs:
    /// - `query`: search string
    /// - `opts`: search-time options (e.g. by-name-only)
    ///
    /// Output:
    /// - `Result<Vec<Package>>` with matches, empty if none found
    ///
    /// # Errors
    /// Returns a typed error on backend failure; an empty match set is not
    /// an error.
    async fn search(&self, query: &str, opts: &SearchOptions) -> Result<Vec<Package>>;

    /// What: Fetch extended info for one package.
    ///
    /// Inputs:
    /// - `package`: package name
    ///
    /// Output:
    /// - `Result<PackageInfo>` with the package's extended metadata
    ///
    /// # Errors
    /// Returns [`crate::error::PoxyError::PackageNotFound`] when absent, or
    /// another typed error on backend failure.
    async fn info(&self, package: &str) -> Result<PackageInfo>;

    /// What: List installed packages, optionally filtered.
    ///
    /// Inputs:
    /// - `opts`: listing options (e.g. explicit-only)
    ///
    /// Output:
    /// - `Result<Vec<Package>>` with the installed set
    ///
    /// # Errors
    /// Returns a typed error on backend failure.
    async fn list_installed(&self, opts: &ListOptions) -> Result<Vec<Package>>;

    /// Whether `package` is installed; never errors on absence.
    async fn is_installed(&self, package: &str) -> bool;

    /// Clean cached package files.
    ///
    /// # Errors
    /// Returns a typed error if the backend's clean command fails.
    async fn clean(&self, opts: &CleanOptions) -> Result<()>;

    /// Remove packages that are no longer required by anything else.
    ///
    /// # Errors
    /// Returns a typed error if the backend's autoremove command fails.
    async fn autoremove(&self) -> Result<()>;
}

/// What: Static identity plus shared mutable state every [`Manager`] adapter
/// embeds.
///
/// Inputs: None (constructed via `BaseManager::new`)
///
/// Output: `BaseManager` instance embedded by a backend adapter
///
/// Details:
/// - The binary name is mutable because some adapters substitute a drop-in
///   replacement after construction (e.g. `apt` discovering `nala` on PATH)
/// - Holds the shared `Executor` every adapter dispatches commands through
#[derive(Debug)]
pub struct BaseManager {
    name: &'static str,
    display_name: &'static str,
    manager_type: ManagerKind,
    needs_sudo: bool,
    binary: Mutex<String>,
    /// Shared command executor (dry-run/elevation/cancellation semantics).
    pub executor: Executor,
}

impl BaseManager {
    /// What: Build base identity state for an adapter.
    ///
    /// Inputs:
    /// - `name`, `display_name`: stable identifier and human-facing label
    /// - `manager_type`: Native, Universal, or AUR
    /// - `binary`: initial binary to shell out to
    /// - `needs_sudo`: whether mutating operations require elevation
    /// - `executor`: shared command executor
    ///
    /// Output:
    /// - `BaseManager` ready to be embedded by a backend adapter
    #[must_use]
    pub fn new(
        name: &'static str,
        display_name: &'static str,
        manager_type: ManagerKind,
        binary: impl Into<String>,
        needs_sudo: bool,
        executor: Executor,
    ) -> Self {
        Self {
            name,
            display_name,
            manager_type,
            needs_sudo,
            binary: Mutex::new(binary.into()),
            executor,
        }
    }

    /// Stable identifier.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Human-facing label.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        self.display_name
    }

    /// Backend kind.
    #[must_use]
    pub const fn manager_type(&self) -> ManagerKind {
        self.manager_type
    }

    /// Whether mutating operations need elevation.
    #[must_use]
    pub const fn needs_sudo(&self) -> bool {
        self.needs_sudo
    }

    /// The binary currently in use for this adapter.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn binary(&self) -> String {
        self.binary.lock().unwrap().clone()
    }

    /// Swap the binary this adapter shells out to (e.g. `apt` -> `nala`).
    #[allow(clippy::unwrap_used)]
    pub fn set_binary(&self, binary: impl Into<String>) {
        *self.binary.lock().unwrap() = binary.into();
    }

    /// Whether `binary()` is currently present on PATH.
    #[must_use]
    pub fn binary_available(&self) -> bool {
        which::which(self.binary()).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_swap_is_visible_to_later_reads() {
        let base = BaseManager::new(
            "apt",
            "Advanced Package Tool",
            ManagerKind::Native,
            "apt",
            true,
            Executor::new(),
        );
        assert_eq!(base.binary(), "apt");
        base.set_binary("nala");
        assert_eq!(base.binary(), "nala");
    }
}
