//! Persistent package-catalog store: one sub-namespace of [`KvStore`] per
//! backend, plus a flat `meta` namespace for per-source refresh timestamps
//! and a `mappings` namespace the canonical-name mapping store persists to.

use crate::error::Result;
use crate::store::kv::KvStore;
#[cfg(feature = "search")]
use crate::types::mapping::MappingEntry;
use crate::types::package::Package;
use std::collections::HashMap;
use std::sync::Mutex;

/// A single cached package record. Identical to [`Package`]; kept as an
/// alias rather than a new type since the on-disk shape and the in-memory
/// one are the same JSON.
pub type PackageEntry = Package;

const META_NAMESPACE: &str = "meta";
const MAPPINGS_NAMESPACE: &str = "mappings";
const MAPPINGS_KEY: &str = "all";
const LAST_UPDATE_PREFIX: &str = "last-update-";

/// What: The on-disk package catalog backing the search index and
/// mapping store.
///
/// Inputs: None (constructed via `MetadataStore::open`)
///
/// Output: `MetadataStore` instance ready for use
///
/// Details:
/// - `packages/<source>/<name>.json` per cached package, a flat `meta`
///   namespace for per-source last-update timestamps, and a `mappings`
///   namespace the canonical-name mapping store persists to
/// - Per-source `KvStore`s are opened lazily on first use, not eagerly at
///   construction
#[derive(Debug)]
pub struct MetadataStore {
    /// Lazily opened, one `KvStore` per source, each holding an exclusive
    /// file lock for its own sub-namespace directory.
    sources: Mutex<HashMap<String, KvStore>>,
    meta: KvStore,
    mappings: KvStore,
}

impl MetadataStore {
    /// Open the metadata store, creating its namespaces if absent.
    ///
    /// # Errors
    /// Returns [`crate::error::PoxyError::Io`] if a namespace directory or
    /// lock file cannot be created.
    pub fn open() -> Result<Self> {
        Self::open_with_prefix("")
    }

    fn open_with_prefix(prefix: &str) -> Result<Self> {
        Ok(Self {
            sources: Mutex::new(HashMap::new()),
            meta: KvStore::open(&format!("{prefix}{META_NAMESPACE}"))?,
            mappings: KvStore::open(&format!("{prefix}{MAPPINGS_NAMESPACE}"))?,
        })
    }

    fn lock_sources(&self) -> std::sync::MutexGuard<'_, HashMap<String, KvStore>> {
        match self.sources.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn source_store<'a>(
        sources: &'a mut HashMap<String, KvStore>,
        source: &str,
    ) -> Result<&'a KvStore> {
        if !sources.contains_key(source) {
            let store = KvStore::open(&format!("packages/{source}"))?;
            sources.insert(source.to_string(), store);
        }
        Ok(&sources[source])
    }

    /// Insert or overwrite one package entry.
    ///
    /// # Errors
    /// Returns [`crate::error::PoxyError::Io`] or
    /// [`crate::error::PoxyError::Json`].
    pub fn add_package(&self, source: &str, name: &str, entry: &PackageEntry) -> Result<()> {
        let mut sources = self.lock_sources();
        Self::source_store(&mut sources, source)?.set(name, entry)
    }

    /// Insert or overwrite a batch of package entries for one source.
    ///
    /// # Errors
    /// Same as [`MetadataStore::add_package`].
    pub fn add_packages(&self, source: &str, entries: &[PackageEntry]) -> Result<()> {
        let mut sources = self.lock_sources();
        let store = Self::source_store(&mut sources, source)?;
        for entry in entries {
            store.set(&entry.name, entry)?;
        }
        Ok(())
    }

    /// Fetch one package entry, or `None` if absent.
    ///
    /// # Errors
    /// Same as [`MetadataStore::add_package`].
    pub fn get_package(&self, source: &str, name: &str) -> Result<Option<PackageEntry>> {
        let mut sources = self.lock_sources();
        Self::source_store(&mut sources, source)?.get(name)
    }

    /// All package entries across every source sub-namespace.
    ///
    /// # Errors
    /// Same as [`MetadataStore::add_package`].
    pub fn get_all_packages(&self) -> Result<Vec<PackageEntry>> {
        let mut all = Vec::new();
        for source in self.known_sources()? {
            all.extend(self.get_packages_by_source(&source)?);
        }
        Ok(all)
    }

    /// All package entries for one source.
    ///
    /// # Errors
    /// Same as [`MetadataStore::add_package`].
    pub fn get_packages_by_source(&self, source: &str) -> Result<Vec<PackageEntry>> {
        let mut sources = self.lock_sources();
        let store = Self::source_store(&mut sources, source)?;
        let mut entries = Vec::new();
        for key in store.keys()? {
            if let Some(entry) = store.get::<PackageEntry>(&key)? {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    /// Remove one package entry; a missing entry is not an error.
    ///
    /// # Errors
    /// Same as [`MetadataStore::add_package`].
    pub fn delete_package(&self, source: &str, name: &str) -> Result<()> {
        let mut sources = self.lock_sources();
        Self::source_store(&mut sources, source)?.delete(name)
    }

    /// Remove every package entry for one source.
    ///
    /// # Errors
    /// Same as [`MetadataStore::add_package`].
    pub fn clear_source(&self, source: &str) -> Result<()> {
        let mut sources = self.lock_sources();
        Self::source_store(&mut sources, source)?.clear()
    }

    /// Remove every package entry across all sources, and the recorded
    /// last-update timestamps.
    ///
    /// # Errors
    /// Same as [`MetadataStore::add_package`].
    pub fn clear(&self) -> Result<()> {
        for source in self.known_sources()? {
            self.clear_source(&source)?;
        }
        self.meta.clear()
    }

    /// Record the RFC3339 timestamp of the last successful refresh for `source`.
    ///
    /// # Errors
    /// Returns [`crate::error::PoxyError::Io`] or
    /// [`crate::error::PoxyError::Json`].
    pub fn set_last_update(&self, source: &str, timestamp: &str) -> Result<()> {
        self.meta.set(&format!("{LAST_UPDATE_PREFIX}{source}"), &timestamp.to_string())
    }

    /// The RFC3339 timestamp of the last recorded refresh for `source`, if any.
    ///
    /// # Errors
    /// Same as [`MetadataStore::set_last_update`].
    pub fn get_last_update(&self, source: &str) -> Result<Option<String>> {
        self.meta.get(&format!("{LAST_UPDATE_PREFIX}{source}"))
    }

    /// Total package count across every source sub-namespace.
    ///
    /// # Errors
    /// Same as [`MetadataStore::add_package`].
    pub fn count(&self) -> Result<usize> {
        let mut total = 0;
        for source in self.known_sources()? {
            total += self.count_by_source(&source)?;
        }
        Ok(total)
    }

    /// Package count for one source.
    ///
    /// # Errors
    /// Same as [`MetadataStore::add_package`].
    pub fn count_by_source(&self, source: &str) -> Result<usize> {
        let mut sources = self.lock_sources();
        Self::source_store(&mut sources, source)?.count()
    }

    /// Persist the full mapping table, overwriting any previous save.
    ///
    /// # Errors
    /// Returns [`crate::error::PoxyError::Io`] or
    /// [`crate::error::PoxyError::Json`].
    #[cfg(feature = "search")]
    pub fn save_mappings(&self, entries: &[MappingEntry]) -> Result<()> {
        self.mappings.set(MAPPINGS_KEY, &entries.to_vec())
    }

    /// Load the previously persisted mapping table, or an empty vector if
    /// none was ever saved.
    ///
    /// # Errors
    /// Same as [`MetadataStore::save_mappings`].
    #[cfg(feature = "search")]
    pub fn load_mappings(&self) -> Result<Vec<MappingEntry>> {
        Ok(self.mappings.get(MAPPINGS_KEY)?.unwrap_or_default())
    }

    /// Every source that has a `packages/<source>` sub-namespace on disk,
    /// merged with any already opened in this process (covers a source
    /// written to for the first time in this call).
    fn known_sources(&self) -> Result<Vec<String>> {
        let mut names: std::collections::HashSet<String> =
            self.lock_sources().keys().cloned().collect();
        let packages_root = crate::store::kv::data_dir().join("packages");
        if packages_root.is_dir() {
            for entry in std::fs::read_dir(&packages_root)? {
                let entry = entry?;
                if entry.file_type()?.is_dir() {
                    names.insert(entry.file_name().to_string_lossy().into_owned());
                }
            }
        }
        Ok(names.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> MetadataStore {
        use std::sync::atomic::{AtomicU32, Ordering};
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let prefix = format!("test-meta-{}-{n}-", std::process::id());
        MetadataStore::open_with_prefix(&prefix).expect("should open")
    }

    fn pkg(name: &str, source: &str) -> PackageEntry {
        PackageEntry {
            name: name.to_string(),
            version: "1.0".to_string(),
            description: String::new(),
            source: source.to_string(),
            installed: true,
            size: None,
        }
    }

    #[test]
    fn add_and_get_package_roundtrips() {
        let store = temp_store();
        let source = format!("test-src-{}", std::process::id());
        store.add_package(&source, "git", &pkg("git", &source)).expect("should add");
        let found = store.get_package(&source, "git").expect("should get");
        assert_eq!(found.map(|p| p.version), Some("1.0".to_string()));
        store.clear_source(&source).expect("should clear");
    }

    #[test]
    fn count_by_source_reflects_batch_insert() {
        let store = temp_store();
        let source = format!("test-batch-{}", std::process::id());
        let entries = vec![pkg("a", &source), pkg("b", &source), pkg("c", &source)];
        store.add_packages(&source, &entries).expect("should add batch");
        assert_eq!(store.count_by_source(&source).expect("should count"), 3);
        store.clear_source(&source).expect("should clear");
    }

    #[test]
    #[cfg(feature = "search")]
    fn mappings_roundtrip_through_the_store() {
        let store = temp_store();
        let entries = vec![MappingEntry::new("vscode", "editor", [("apt", "code")])];
        store.save_mappings(&entries).expect("should save");
        let loaded = store.load_mappings().expect("should load");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].canonical, "vscode");
    }
}
