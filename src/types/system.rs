//! Operating-system detection data types.

use serde::{Deserialize, Serialize};

/// Operating system family, as detected by the Registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Os {
    /// Linux and Linux-derived distributions.
    Linux,
    /// macOS.
    Darwin,
    /// Windows.
    Windows,
    /// Detection failed or the platform is not one of the above.
    Unknown,
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Linux => "Linux",
            Self::Darwin => "Darwin",
            Self::Windows => "Windows",
            Self::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// Detected system identity, used by the Registry to pick a native manager.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Broad OS family.
    pub os: Os,
    /// CPU architecture (`"x86_64"`, `"aarch64"`, ...).
    pub arch: String,
    /// Distribution ID (`/etc/os-release` `ID`), empty outside Linux.
    pub distribution: String,
    /// `ID_LIKE` family chain, distribution-first.
    pub distro_family: Vec<String>,
    /// `VERSION_ID` from `/etc/os-release`, when available.
    pub version_id: String,
    /// `PRETTY_NAME` from `/etc/os-release`, when available.
    pub pretty_name: String,
}

impl SystemInfo {
    /// Whether `name` is either the distribution itself or in its `ID_LIKE` chain.
    #[must_use]
    pub fn matches_family(&self, name: &str) -> bool {
        self.distribution == name || self.distro_family.iter().any(|f| f == name)
    }
}
