//! Package-related data types for AUR operations.

use serde::{Deserialize, Serialize};

/// Basic AUR package information from search results.
///
/// This is a lightweight representation suitable for lists and search results.
/// For full package details, see [`AurPackageDetails`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AurPackage {
    /// Canonical package name.
    pub name: String,
    /// Version string as reported by AUR.
    pub version: String,
    /// One-line description suitable for list display.
    pub description: String,
    /// AUR popularity score when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
    /// Timestamp when package was flagged out-of-date (Unix timestamp in seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_of_date: Option<u64>,
    /// Whether package is orphaned (no active maintainer).
    #[serde(default)]
    pub orphaned: bool,
    /// Package maintainer username (None if orphaned).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintainer: Option<String>,
}

/// Full AUR package details from the info endpoint.
///
/// Contains comprehensive information about a package, including all dependencies,
/// metadata, and AUR-specific fields.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AurPackageDetails {
    /// Package name.
    pub name: String,
    /// Full version string.
    pub version: String,
    /// Long description.
    pub description: String,
    /// Upstream project URL (may be empty if unknown).
    pub url: String,
    /// SPDX or human-readable license identifiers.
    pub licenses: Vec<String>,
    /// Group memberships.
    pub groups: Vec<String>,
    /// Virtual provisions supplied by this package.
    pub provides: Vec<String>,
    /// Required dependencies.
    pub depends: Vec<String>,
    /// Build dependencies.
    pub make_depends: Vec<String>,
    /// Optional dependencies with annotations.
    pub opt_depends: Vec<String>,
    /// Conflicting packages.
    pub conflicts: Vec<String>,
    /// Packages that this package replaces.
    pub replaces: Vec<String>,
    /// Package maintainer username (None if orphaned).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintainer: Option<String>,
    /// First submission timestamp (Unix timestamp in seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_submitted: Option<i64>,
    /// Last modification timestamp (Unix timestamp in seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<i64>,
    /// AUR popularity score when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
    /// Number of votes on AUR.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_votes: Option<u64>,
    /// Timestamp when package was flagged out-of-date (Unix timestamp in seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_of_date: Option<u64>,
    /// Whether package is orphaned (no active maintainer).
    #[serde(default)]
    pub orphaned: bool,

    /// Package base name; differs from `name` for split packages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_base: Option<String>,
    /// Path component of the tarball snapshot URL (`URLPath` in RPC v5).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_path: Option<String>,
    /// Test-time dependencies.
    #[serde(default)]
    pub check_depends: Vec<String>,
    /// Free-text keywords attached to the package.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl AurPackageDetails {
    /// `git clone` URL for the package's build-script repository.
    #[must_use]
    pub fn git_clone_url(&self) -> String {
        let base = self.package_base.as_deref().unwrap_or(&self.name);
        format!("https://aur.archlinux.org/{base}.git")
    }

    /// Full URL to the source tarball snapshot, or `None` without a path.
    #[must_use]
    pub fn snapshot_url(&self) -> Option<String> {
        self.url_path
            .as_ref()
            .map(|path| format!("https://aur.archlinux.org{path}"))
    }

    /// Whether the package is currently flagged out-of-date.
    #[must_use]
    pub const fn is_out_of_date(&self) -> bool {
        self.out_of_date.is_some()
    }

    /// The flagged-out-of-date time, if any, as a UTC datetime.
    #[must_use]
    pub fn out_of_date_time(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.out_of_date
            .and_then(|ts| chrono::DateTime::from_timestamp(i64::try_from(ts).ok()?, 0))
    }

    /// First-submission time as a UTC datetime.
    #[must_use]
    pub fn first_submitted_time(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.first_submitted
            .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0))
    }

    /// Last-modification time as a UTC datetime.
    #[must_use]
    pub fn last_modified_time(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.last_modified
            .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0))
    }

    /// Runtime plus build-time dependencies, concatenated.
    #[must_use]
    pub fn all_dependencies(&self) -> Vec<String> {
        self.depends
            .iter()
            .cloned()
            .chain(self.make_depends.iter().cloned())
            .collect()
    }

    /// Whether the package has no active maintainer.
    #[must_use]
    pub const fn is_orphan(&self) -> bool {
        self.maintainer.is_none()
    }
}

/// A package as reported by some backend, independent of which one.
///
/// Equality/dedup key across the whole facade is `(source, name)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Package name within its backend.
    pub name: String,
    /// Version string as reported by the backend.
    pub version: String,
    /// One-line description.
    pub description: String,
    /// Backend identifier this package was reported by (e.g. `"pacman"`, `"aur"`).
    pub source: String,
    /// Whether the package is currently installed.
    pub installed: bool,
    /// Installed or download size in bytes, when the backend reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl Package {
    /// The `(source, name)` dedup key for this package.
    #[must_use]
    pub fn dedup_key(&self) -> (String, String) {
        (self.source.clone(), self.name.clone())
    }
}

/// A package plus the extra fields a backend's `info` operation can report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackageInfo {
    /// Base package fields.
    #[serde(flatten)]
    pub package: Package,
    /// Repository the package was resolved from (distinct from `source` backend id).
    #[serde(default)]
    pub repository: String,
    /// Maintainer identifier, when reported.
    #[serde(default)]
    pub maintainer: String,
    /// License identifier(s).
    #[serde(default)]
    pub license: String,
    /// Upstream project URL.
    #[serde(default)]
    pub url: String,
    /// Declared dependency names.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Install timestamp (RFC3339), when the backend reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_timestamp: Option<String>,
}

/// AUR comment from a package page.
///
/// Contains author, date, and content of a comment, with optional timestamp
/// for reliable chronological sorting.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AurComment {
    /// Stable comment identifier parsed from DOM when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Comment author username.
    pub author: String,
    /// Human-readable date string.
    pub date: String,
    /// Unix timestamp for sorting (None if parsing failed).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_timestamp: Option<i64>,
    /// URL from the date link (None if not available).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_url: Option<String>,
    /// Comment content text (formatted as markdown-like syntax).
    pub content: String,
    /// Whether this comment is pinned (shown at the top).
    #[serde(default)]
    pub pinned: bool,
}
