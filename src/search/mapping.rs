//! In-memory canonical-name mapping store, with optional persistence through
//! [`crate::store::MetadataStore`].

use crate::types::mapping::{seed_mappings, MappingEntry};
use std::collections::HashMap;
use std::sync::RwLock;

#[cfg(feature = "cache-disk")]
use crate::error::Result;
#[cfg(feature = "cache-disk")]
use crate::store::MetadataStore;

/// What: Bi-directional lookup between a canonical package identity
/// (`"vscode"`) and each backend's own name for it (`apt` -> `"code"`).
///
/// Inputs: None (constructed via `MappingStore::new`/`MappingStore::empty`)
///
/// Output: `MappingStore` instance ready for lookups
///
/// Details:
/// - `new()` seeds the table from the built-in [`seed_mappings`] list;
///   `empty()` starts with nothing, not even the seed list
/// - Optional on-disk persistence through `save_to_db`/`load_from_db`,
///   gated on `cache-disk`
#[derive(Debug)]
pub struct MappingStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    by_canonical: HashMap<String, MappingEntry>,
    /// `(source, lowercase source-name)` → canonical.
    by_source_name: HashMap<(String, String), String>,
}

impl Default for MappingStore {
    fn default() -> Self {
        let store = Self { inner: RwLock::new(Inner::default()) };
        store.add_batch(seed_mappings());
        store
    }
}

impl MappingStore {
    /// A mapping store pre-populated with the built-in seed list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A mapping store with no entries at all, not even the seed list.
    #[must_use]
    pub fn empty() -> Self {
        Self { inner: RwLock::new(Inner::default()) }
    }

    fn lock_mut(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lock_ref(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        match self.inner.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Insert or replace one entry, indexing every `(source, name)` pair it carries.
    pub fn add(&self, entry: MappingEntry) {
        let mut inner = self.lock_mut();
        for (source, name) in &entry.sources {
            inner.by_source_name.insert((source.clone(), name.to_lowercase()), entry.canonical.clone());
        }
        inner.by_canonical.insert(entry.canonical.clone(), entry);
    }

    /// Insert or replace a batch of entries.
    pub fn add_batch(&self, entries: Vec<MappingEntry>) {
        for entry in entries {
            self.add(entry);
        }
    }

    /// Look up by canonical name.
    #[must_use]
    pub fn get_by_canonical(&self, canonical: &str) -> Option<MappingEntry> {
        self.lock_ref().by_canonical.get(canonical).cloned()
    }

    /// Look up the canonical entry owning a given `(source, name)` pair.
    #[must_use]
    pub fn get_by_source_name(&self, source: &str, name: &str) -> Option<MappingEntry> {
        let inner = self.lock_ref();
        let canonical = inner.by_source_name.get(&(source.to_string(), name.to_lowercase()))?;
        inner.by_canonical.get(canonical).cloned()
    }

    /// The name `source` uses for the package known canonically as `canonical`, if mapped.
    #[must_use]
    pub fn get_name_for_source(&self, canonical: &str, source: &str) -> Option<String> {
        self.lock_ref().by_canonical.get(canonical)?.sources.get(source).cloned()
    }

    /// Given one backend's name for a package, the full cross-source mapping for it.
    #[must_use]
    pub fn find_equivalent(&self, source: &str, name: &str) -> Option<MappingEntry> {
        self.get_by_source_name(source, name)
    }

    /// Every mapping entry, in no particular order.
    #[must_use]
    pub fn get_all(&self) -> Vec<MappingEntry> {
        self.lock_ref().by_canonical.values().cloned().collect()
    }

    /// Remove every entry, including the seed list.
    pub fn clear(&self) {
        *self.lock_mut() = Inner::default();
    }

    /// Number of distinct canonical entries.
    #[must_use]
    pub fn size(&self) -> usize {
        self.lock_ref().by_canonical.len()
    }

    /// Persist the full table to `store`'s `mappings` namespace.
    ///
    /// # Errors
    /// Propagates [`MetadataStore::save_mappings`] errors.
    #[cfg(feature = "cache-disk")]
    pub fn save_to_db(&self, store: &MetadataStore) -> Result<()> {
        store.save_mappings(&self.get_all())
    }

    /// Replace the table with whatever was last persisted to `store`.
    ///
    /// # Errors
    /// Propagates [`MetadataStore::load_mappings`] errors.
    #[cfg(feature = "cache-disk")]
    pub fn load_from_db(&self, store: &MetadataStore) -> Result<()> {
        let entries = store.load_mappings()?;
        self.clear();
        self.add_batch(entries);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_store_resolves_vscode_across_sources() {
        let store = MappingStore::new();
        let entry = store.get_by_source_name("apt", "code").expect("should find vscode");
        assert_eq!(entry.canonical, "vscode");
        assert_eq!(store.get_name_for_source("vscode", "flatpak").as_deref(), Some("com.visualstudio.code"));
    }

    #[test]
    fn find_equivalent_is_case_insensitive_on_the_source_name() {
        let store = MappingStore::new();
        let entry = store.find_equivalent("apt", "CODE").expect("should find vscode");
        assert_eq!(entry.canonical, "vscode");
    }

    #[test]
    fn empty_store_has_no_seeded_entries() {
        let store = MappingStore::empty();
        assert_eq!(store.size(), 0);
        assert!(store.get_by_canonical("vscode").is_none());
    }

    #[test]
    fn add_overwrites_an_existing_canonical_entry() {
        let store = MappingStore::empty();
        store.add(MappingEntry::new("thing", "misc", [("apt", "thing-old")]));
        store.add(MappingEntry::new("thing", "misc", [("apt", "thing-new")]));
        assert_eq!(store.get_name_for_source("thing", "apt").as_deref(), Some("thing-new"));
        assert!(store.get_by_source_name("apt", "thing-old").is_none());
    }
}
