//! Concrete [`super::Manager`] implementations, one per supported backend.

mod generic;
#[cfg(feature = "aur")]
mod native_aur;
mod pacman;

pub use generic::{CliSpec, GenericManager};
#[cfg(feature = "aur")]
pub use native_aur::NativeAurManager;
pub use pacman::PacmanManager;

use crate::exec::Executor;
use crate::manager::{Manager, ManagerKind};
use generic::{
    APK_SPEC, APT_SPEC, BREW_SPEC, CHOCOLATEY_SPEC, DNF_SPEC, EMERGE_SPEC, EOPKG_SPEC,
    FLATPAK_SPEC, NIXPKG_SPEC, SCOOP_SPEC, SLACKPKG_SPEC, SNAP_SPEC, SWUPD_SPEC, WINGET_SPEC,
    XBPS_SPEC, ZYPPER_SPEC,
};

/// Construct every statically-known backend adapter, sharing one executor.
///
/// Each returned [`Manager`] is boxed; callers register the ones relevant
/// to their platform (or all of them -- unavailable backends simply report
/// `is_available() == false`).
#[must_use]
pub fn all_backends(executor: Executor) -> Vec<Box<dyn Manager>> {
    let mut backends: Vec<Box<dyn Manager>> = vec![
        Box::new(PacmanManager::new(executor)),
        Box::new(GenericManager::new("apt", "Advanced Package Tool", ManagerKind::Native, "apt", APT_SPEC, executor)),
        Box::new(GenericManager::new("dnf", "Dandified YUM", ManagerKind::Native, "dnf", DNF_SPEC, executor)),
        Box::new(GenericManager::new("zypper", "Zypper", ManagerKind::Native, "zypper", ZYPPER_SPEC, executor)),
        Box::new(GenericManager::new("apk", "Alpine Package Keeper", ManagerKind::Native, "apk", APK_SPEC, executor)),
        Box::new(GenericManager::new("xbps", "X Binary Package System", ManagerKind::Native, "xbps-install", XBPS_SPEC, executor)),
        Box::new(GenericManager::new("emerge", "Portage", ManagerKind::Native, "emerge", EMERGE_SPEC, executor)),
        Box::new(GenericManager::new("eopkg", "Eopkg", ManagerKind::Native, "eopkg", EOPKG_SPEC, executor)),
        Box::new(GenericManager::new("nixpkg", "Nix", ManagerKind::Universal, "nix", NIXPKG_SPEC, executor)),
        Box::new(GenericManager::new("slackpkg", "Slackpkg", ManagerKind::Native, "slackpkg", SLACKPKG_SPEC, executor)),
        Box::new(GenericManager::new("swupd", "Swupd", ManagerKind::Native, "swupd", SWUPD_SPEC, executor)),
        Box::new(GenericManager::new("brew", "Homebrew", ManagerKind::Native, "brew", BREW_SPEC, executor)),
        Box::new(GenericManager::new("winget", "Windows Package Manager", ManagerKind::Native, "winget", WINGET_SPEC, executor)),
        Box::new(GenericManager::new("chocolatey", "Chocolatey", ManagerKind::Native, "choco", CHOCOLATEY_SPEC, executor)),
        Box::new(GenericManager::new("scoop", "Scoop", ManagerKind::Native, "scoop", SCOOP_SPEC, executor)),
        Box::new(GenericManager::new("flatpak", "Flatpak", ManagerKind::Universal, "flatpak", FLATPAK_SPEC, executor)),
        Box::new(GenericManager::new("snap", "Snap", ManagerKind::Universal, "snap", SNAP_SPEC, executor)),
    ];
    #[cfg(feature = "aur")]
    backends.push(Box::new(NativeAurManager::new(executor)));
    backends
}
