//! Lifecycle coordinator for [`TfIdfIndex`]: a fast `load` from the
//! persisted metadata cache and a slower `build` that re-scans every live
//! backend, with a single-flight guard so a second concurrent call is a no-op.

use crate::error::Result;
use crate::registry::Registry;
use crate::search::index::TfIdfIndex;
use crate::types::manager::ListOptions;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[cfg(feature = "cache-disk")]
use crate::store::MetadataStore;

#[derive(Default)]
struct State {
    loading: bool,
    last_error: Option<String>,
    last_load_time: Option<DateTime<Utc>>,
}

/// What: Lifecycle coordinator for an external [`TfIdfIndex`].
///
/// Inputs: None (constructed via `IndexBuilder::new`)
///
/// Output: `IndexBuilder` instance ready for `load_*`/`build_*`
///
/// Details:
/// - Owns no index data itself; loads from the on-disk metadata cache
///   (`load_*`) or rebuilds from the live registry (`build_*`)
/// - A `Mutex<State>` single-flight guard makes a second concurrent call a
///   no-op instead of racing the first
pub struct IndexBuilder {
    registry: Arc<Registry>,
    index: Arc<TfIdfIndex>,
    #[cfg(feature = "cache-disk")]
    store: Option<Arc<MetadataStore>>,
    state: Mutex<State>,
}

impl IndexBuilder {
    /// An index builder with no persisted-store backing; `load_*` is then a
    /// no-op and only `build_*` (live registry scan) can populate the index.
    #[must_use]
    pub fn new(registry: Arc<Registry>, index: Arc<TfIdfIndex>) -> Self {
        Self {
            registry,
            index,
            #[cfg(feature = "cache-disk")]
            store: None,
            state: Mutex::new(State::default()),
        }
    }

    /// Attach a persisted metadata store so `load_*` has a cache to read.
    #[cfg(feature = "cache-disk")]
    #[must_use]
    pub fn with_store(mut self, store: Arc<MetadataStore>) -> Self {
        self.store = Some(store);
        self
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Whether a `load_*`/`build_*` call is currently in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lock_state().loading
    }

    /// The error message from the most recent failed `load_*`/`build_*` call.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.lock_state().last_error.clone()
    }

    /// When the index was last successfully populated.
    #[must_use]
    pub fn last_load_time(&self) -> Option<DateTime<Utc>> {
        self.lock_state().last_load_time
    }

    /// Whether the index has never been populated, or was last populated
    /// longer than `max_age` ago.
    #[must_use]
    pub fn needs_refresh(&self, max_age: Duration) -> bool {
        match self.last_load_time() {
            None => true,
            Some(last) => {
                let age = Utc::now().signed_duration_since(last);
                age.to_std().map(|age| age > max_age).unwrap_or(true)
            }
        }
    }

    /// Poll [`IndexBuilder::is_loading`] at a fixed resolution until it
    /// clears or `timeout` elapses. Returns whether loading finished.
    pub async fn wait_for_load(&self, timeout: Duration) -> bool {
        let start = std::time::Instant::now();
        while self.is_loading() {
            if start.elapsed() >= timeout {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        true
    }

    fn begin(&self) -> bool {
        let mut state = self.lock_state();
        if state.loading {
            return false;
        }
        state.loading = true;
        true
    }

    fn finish(&self, result: &Result<usize>) {
        let mut state = self.lock_state();
        state.loading = false;
        match result {
            Ok(_) => {
                state.last_error = None;
                state.last_load_time = Some(Utc::now());
            }
            Err(err) => state.last_error = Some(err.to_string()),
        }
    }

    /// What: Populate the index from the persisted metadata cache.
    ///
    /// Inputs: None
    ///
    /// Output:
    /// - `Result<usize>` with the number of packages loaded, or `0` with no
    ///   error if no store is attached
    ///
    /// # Errors
    /// Propagates [`crate::store::MetadataStore::get_all_packages`] errors.
    #[cfg(feature = "cache-disk")]
    pub fn load_sync(&self) -> Result<usize> {
        if !self.begin() {
            return Ok(0);
        }
        let result = (|| {
            let Some(store) = &self.store else { return Ok(0) };
            let packages = store.get_all_packages()?;
            let count = packages.len();
            self.index.add_batch(packages);
            Ok(count)
        })();
        self.finish(&result);
        result
    }

    /// Async, single-flight version of [`IndexBuilder::load_sync`]. A second
    /// call while one is already in flight returns `Ok(0)` immediately.
    #[cfg(feature = "cache-disk")]
    pub async fn load_async(self: &Arc<Self>) -> Result<usize> {
        let this = Arc::clone(self);
        tokio::task::spawn_blocking(move || this.load_sync()).await.unwrap_or(Ok(0))
    }

    /// What: Populate the index by scanning every available live backend's
    /// installed packages.
    ///
    /// Inputs: None
    ///
    /// Output:
    /// - `Result<usize>` with the number of packages indexed
    ///
    /// Details:
    /// - Persists each backend's packages to the attached metadata store
    ///   (if any) before adding them to the index
    ///
    /// # Errors
    /// Returns the first backend error encountered while listing packages,
    /// without aborting the scan of the remaining backends.
    pub async fn build_sync(&self) -> Result<usize> {
        if !self.begin() {
            return Ok(0);
        }
        let result = self.build_inner().await;
        self.finish(&result);
        result
    }

    async fn build_inner(&self) -> Result<usize> {
        let mut total = 0;
        let mut first_error = None;
        for manager in self.registry.available().await {
            match manager.list_installed(&ListOptions::default()).await {
                Ok(packages) => {
                    total += packages.len();
                    #[cfg(feature = "cache-disk")]
                    if let Some(store) = &self.store {
                        store.add_packages(manager.name(), &packages)?;
                    }
                    self.index.add_batch(packages);
                }
                Err(err) if first_error.is_none() => first_error = Some(err),
                Err(_) => {}
            }
        }
        if let Some(err) = first_error {
            return Err(err);
        }
        Ok(total)
    }

    /// Async, single-flight version of [`IndexBuilder::build_sync`]. A
    /// second call while one is already in flight returns `Ok(0)` immediately.
    pub async fn build_async(self: &Arc<Self>) -> Result<usize> {
        if !self.begin() {
            return Ok(0);
        }
        let result = self.build_inner().await;
        self.finish(&result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Registry, RegistryConfig};

    #[tokio::test]
    async fn needs_refresh_is_true_before_the_first_load() {
        let registry = Arc::new(Registry::new(RegistryConfig::default()));
        let index = Arc::new(TfIdfIndex::new());
        let builder = IndexBuilder::new(registry, index);
        assert!(builder.needs_refresh(Duration::from_secs(60)));
        assert!(builder.last_load_time().is_none());
    }

    #[tokio::test]
    async fn build_sync_on_an_empty_registry_indexes_nothing() {
        let registry = Arc::new(Registry::new(RegistryConfig::default()));
        let index = Arc::new(TfIdfIndex::new());
        let builder = IndexBuilder::new(registry, index);
        let count = builder.build_sync().await.expect("should succeed with no backends");
        assert_eq!(count, 0);
        assert!(!builder.needs_refresh(Duration::from_secs(60)));
    }

    #[tokio::test]
    async fn wait_for_load_returns_immediately_when_idle() {
        let registry = Arc::new(Registry::new(RegistryConfig::default()));
        let index = Arc::new(TfIdfIndex::new());
        let builder = IndexBuilder::new(registry, index);
        assert!(builder.wait_for_load(Duration::from_millis(10)).await);
    }
}
