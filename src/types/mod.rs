//! Shared data types for poxy-core.

pub mod package;

#[cfg(feature = "aur")]
pub mod health;

#[cfg(feature = "aur")]
pub mod dependency;

pub mod manager;
pub mod system;

#[cfg(feature = "snapshot")]
pub mod snapshot;

#[cfg(feature = "cache-disk")]
pub mod history;

#[cfg(feature = "search")]
pub mod mapping;

pub use package::{AurComment, AurPackage, AurPackageDetails};

#[cfg(feature = "aur")]
pub use health::{HealthStatus, ServiceStatus};

#[cfg(feature = "aur")]
pub use dependency::{
    Dependency, DependencySource, DependencySpec, DependencyStatus, PackageRef, PackageSource,
    SrcinfoData,
};

pub use manager::{InstallOptions, ManagerKind, UninstallOptions};
pub use system::SystemInfo;

#[cfg(feature = "snapshot")]
pub use snapshot::{Change, ChangeKind, Diff, Snapshot, SnapshotMeta, SnapshotPackage, Trigger};

#[cfg(feature = "cache-disk")]
pub use history::{HistoryEntry, Operation};

#[cfg(feature = "search")]
pub use mapping::MappingEntry;
