//! Core engine for a cross-platform universal package manager facade.
//!
//! `poxy-core` normalizes a dozen-plus native and universal package managers
//! (apt, dnf, pacman, zypper, apk, xbps, emerge, eopkg, nix, slackpkg, swupd,
//! brew, winget, chocolatey, scoop, flatpak, snap) behind one uniform
//! [`manager::Manager`] trait, plus a native Arch User Repository pipeline
//! that doesn't shell out to `yay`/`paru`.
//!
//! # Features
//!
//! - `aur` (default): native AUR RPC client, SRCINFO/PKGBUILD parsing, and
//!   the sandboxed builder pipeline.
//! - `sandbox-linux` (default on Unix): user-namespace jail for the AUR
//!   builder.
//! - `search` (default): TF-IDF search index, mapping store, and the fused
//!   search engine.
//! - `snapshot` (default): snapshot capture, diffing, and restore planning.
//! - `cache-disk` (default): on-disk metadata/history/snapshot/response
//!   persistence.
//!
//! This crate is deliberately free of argument parsing, interactive
//! prompts, a TUI, an on-disk config file format, terminal styling, and
//! shell completion — those live in a consuming CLI.
//!
//! # Examples
//!
//! ## Native AUR search
//!
//! ```no_run
//! use poxy_core::AurRpcClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AurRpcClient::new()?;
//! let packages = client.aur().search("yay").await?;
//! println!("Found {} packages", packages.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Registry-driven install
//!
//! ```no_run
//! use poxy_core::registry::Registry;
//! use poxy_core::manager::InstallOptions;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Registry::detect();
//! let manager = registry.native().await.ok_or("no native manager detected")?;
//! manager.install(&["ripgrep".to_string()], &InstallOptions::default()).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod exec;
pub mod types;

#[cfg(feature = "aur")]
pub mod env;

#[cfg(feature = "aur")]
pub mod aur;

#[cfg(feature = "aur")]
pub mod client;

#[cfg(feature = "aur")]
pub mod deps;

pub mod cache;

#[cfg(feature = "aur")]
pub mod health;

pub mod manager;
pub mod registry;

#[cfg(feature = "cache-disk")]
pub mod store;

#[cfg(feature = "search")]
pub mod search;

#[cfg(feature = "snapshot")]
pub mod snapshot;

#[cfg(all(feature = "aur", feature = "sandbox-linux"))]
pub mod sandbox;

/// Prelude module for convenient imports.
///
/// This module re-exports commonly used types, traits, and functions,
/// allowing you to import everything you need with a single
/// `use poxy_core::prelude::*;`.
pub mod prelude;

// Re-export commonly used types
pub use error::{PoxyError as Error, Result};
pub use manager::{InstallOptions, Manager, UninstallOptions};
pub use registry::Registry;
pub use types::{AurComment, AurPackage, AurPackageDetails};

#[cfg(feature = "aur")]
pub use types::{HealthStatus, ServiceStatus};

#[cfg(feature = "aur")]
pub use aur::{AurApi, MockAurApi};

#[cfg(feature = "aur")]
pub use client::{AurRpcClient, AurRpcClientBuilder, CacheInvalidator, RetryPolicy};

#[cfg(feature = "aur")]
pub use cache::{CacheConfig, CacheConfigBuilder};

#[cfg(feature = "aur")]
pub use aur::validation::ValidationConfig;
