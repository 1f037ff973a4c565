//! PKGBUILD/.SRCINFO parsing and pacman-backed package queries.
//!
//! This module backs the native AUR pipeline: turning raw `.SRCINFO`/`PKGBUILD`
//! text and `pacman` output into the dependency specs the AUR builder checks
//! before handing a package off to `makepkg`. It does not attempt
//! cross-distribution dependency resolution or transitive graph analysis —
//! those are out of scope; a single backend (`pacman`) is queried directly.
//!
//! # Examples
//!
//! ## Parsing a dependency specification
//!
//! ```no_run
//! use poxy_core::deps::parse_dep_spec;
//!
//! let spec = parse_dep_spec("python>=3.12");
//! assert_eq!(spec.name, "python");
//! assert_eq!(spec.version_req, ">=3.12");
//! ```
//!
//! ## Parsing .SRCINFO content
//!
//! ```no_run
//! use poxy_core::deps::parse_srcinfo;
//!
//! let srcinfo_content = r#"
//! pkgbase = my-package
//! pkgname = my-package
//! pkgver = 1.0.0
//! pkgrel = 1
//! depends = glibc
//! depends = python>=3.10
//! "#;
//!
//! let data = parse_srcinfo(srcinfo_content);
//! assert_eq!(data.pkgname, "my-package");
//! assert!(data.depends.contains(&"glibc".to_string()));
//! ```
//!
//! ## Parsing a PKGBUILD's dependency arrays
//!
//! ```no_run
//! use poxy_core::deps::parse_pkgbuild_deps;
//!
//! let pkgbuild = r#"
//! depends=('glibc' 'python>=3.10')
//! makedepends=('rust' 'cargo')
//! "#;
//!
//! let (deps, makedeps, checkdeps, optdeps) = parse_pkgbuild_deps(pkgbuild);
//! assert!(deps.contains(&"glibc".to_string()));
//! ```
//!
//! ## Version comparison
//!
//! ```no_run
//! use poxy_core::deps::version_satisfies;
//!
//! assert!(version_satisfies("2.0", ">=1.5"));
//! assert!(!version_satisfies("1.0", ">=1.5"));
//! ```
//!
//! ## Querying installed packages
//!
//! ```no_run
//! use poxy_core::deps::get_installed_packages;
//!
//! let installed = get_installed_packages().unwrap();
//! println!("Found {} installed packages", installed.len());
//! ```
//!
//! ## Fetching .SRCINFO from the AUR
//!
//! ```no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use poxy_core::deps::fetch_srcinfo;
//! use reqwest::Client;
//!
//! let client = Client::new();
//! let srcinfo = fetch_srcinfo(&client, "yay").await?;
//! let data = poxy_core::deps::parse_srcinfo(&srcinfo);
//! println!("Package: {}", data.pkgname);
//! # Ok(())
//! # }
//! ```

mod parse;
mod pkgbuild;
mod query;
mod srcinfo;
mod version;

pub use parse::{parse_dep_spec, parse_pacman_si_conflicts, parse_pacman_si_deps};
pub use pkgbuild::{parse_pkgbuild_conflicts, parse_pkgbuild_deps};
pub use query::{
    get_available_version, get_installed_packages, get_installed_version, get_provided_packages,
    get_upgradable_packages, is_package_installed_or_provided,
};
pub use srcinfo::{fetch_srcinfo, parse_srcinfo, parse_srcinfo_conflicts, parse_srcinfo_deps};
pub use version::{
    compare_versions, extract_major_component, is_major_version_bump, version_satisfies,
};
