//! Prelude module for convenient imports.
//!
//! Re-exports the types most callers need from one place:
//! `use poxy_core::prelude::*;`.

// Core client types
#[cfg(feature = "aur")]
pub use crate::client::{AurRpcClient, AurRpcClientBuilder};

// Data types
pub use crate::types::{AurComment, AurPackage, AurPackageDetails};

// Error handling
pub use crate::error::{PoxyError as Error, Result};

// Traits
#[cfg(feature = "aur")]
pub use crate::aur::AurApi;

// Testing
#[cfg(feature = "aur")]
pub use crate::aur::MockAurApi;

// Configuration types
#[cfg(feature = "aur")]
pub use crate::cache::{CacheConfig, CacheConfigBuilder};

#[cfg(feature = "aur")]
pub use crate::aur::validation::ValidationConfig;

#[cfg(feature = "aur")]
pub use crate::client::RetryPolicy;

#[cfg(feature = "aur")]
pub use crate::client::CacheInvalidator;

// Health types
#[cfg(feature = "aur")]
pub use crate::types::{HealthStatus, ServiceStatus};

// Uniform manager contract and registry
pub use crate::manager::{InstallOptions, Manager, ManagerKind, UninstallOptions};
pub use crate::registry::Registry;

#[cfg(feature = "search")]
pub use crate::search::{SearchEngine, SearchResult};

#[cfg(feature = "snapshot")]
pub use crate::snapshot::{compare, plan_restore, RestoreOptions, RestorePlan};

#[cfg(feature = "snapshot")]
pub use crate::types::snapshot::{Diff, Snapshot, Trigger};
