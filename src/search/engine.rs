//! Fused search: the TF-IDF index when warm, the live registry fan-out when
//! cold or when a fresher answer is requested, merged into one ranked list.

use crate::manager::Package;
use crate::registry::Registry;
use crate::search::index::{IndexSearchOptions, TfIdfIndex};
use crate::search::mapping::MappingStore;
use crate::search::{name_match_reason, MatchReason, SearchResult};
use crate::types::manager::SearchOptions as BackendSearchOptions;
use std::sync::Arc;

/// Live-only results are scaled by this factor before merging with indexed
/// results, so a freshly-registered package never outranks an established,
/// well-matched indexed one purely by being unscored.
const LIVE_ONLY_SCALE: f64 = 0.8;

/// Weights for the cold-index (no index built yet) basic scoring fallback.
const BASIC_EXACT: f64 = 100.0;
const BASIC_PREFIX: f64 = 50.0;
const BASIC_CONTAINS: f64 = 25.0;
const BASIC_DESCRIPTION: f64 = 10.0;
const BASIC_OTHER: f64 = 1.0;
const BASIC_INSTALLED_BOOST: f64 = 1.5;
const BASIC_NATIVE_BOOST: f64 = 1.2;

/// Options for [`SearchEngine::search`].
#[derive(Clone, Debug, Default)]
pub struct EngineSearchOptions {
    /// Maximum number of results; `0` means unlimited.
    pub limit: usize,
    /// Restrict results to one backend.
    pub source_filter: Option<String>,
    /// Only return packages that are already installed.
    pub installed_only: bool,
    /// Prefer the detected native backend's results when scoring ties occur.
    pub native_first: bool,
}

/// What: Layers [`TfIdfIndex`] and [`MappingStore`] over a live [`Registry`].
///
/// Inputs: None (constructed via `SearchEngine::new`)
///
/// Output: `SearchEngine` instance ready for `search`
///
/// Details:
/// - Falls back to a direct, unscored registry fan-out while the index is
///   cold (`index_size() == 0`), and merges live results into the warm
///   index search otherwise
pub struct SearchEngine {
    registry: Arc<Registry>,
    index: Arc<TfIdfIndex>,
    mappings: Arc<MappingStore>,
}

impl SearchEngine {
    /// Build an engine over an existing registry, index, and mapping store.
    #[must_use]
    pub fn new(registry: Arc<Registry>, index: Arc<TfIdfIndex>, mappings: Arc<MappingStore>) -> Self {
        Self { registry, index, mappings }
    }

    /// Whether the index has ever been populated.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.index.size() > 0
    }

    /// Number of documents currently in the index.
    #[must_use]
    pub fn index_size(&self) -> usize {
        self.index.size()
    }

    async fn native_source_name(&self) -> Option<String> {
        self.registry.native().await.map(|m| m.name().to_string())
    }

    async fn live_search(&self, query: &str, opts: &EngineSearchOptions) -> Vec<Package> {
        let backend_opts = BackendSearchOptions {
            limit: if opts.limit > 0 { opts.limit * 2 } else { 0 },
            installed_only: opts.installed_only,
            search_in_desc: true,
            exact_match: false,
        };
        if let Some(source) = &opts.source_filter {
            let Some(manager) = self.registry.get(source) else { return Vec::new() };
            return manager.search(query, &backend_opts).await.unwrap_or_default();
        }
        self.registry.search_all(query, &backend_opts).await.0
    }

    fn basic_score(pkg: &Package, query: &str, native_source: Option<&str>) -> (f64, MatchReason) {
        let reason = name_match_reason(&pkg.name, query).unwrap_or_else(|| {
            if pkg.description.to_lowercase().contains(&query.to_lowercase()) {
                MatchReason::DescriptionContains
            } else {
                MatchReason::Keyword
            }
        });
        let mut score = match reason {
            MatchReason::ExactName => BASIC_EXACT,
            MatchReason::NamePrefix => BASIC_PREFIX,
            MatchReason::NameContains => BASIC_CONTAINS,
            MatchReason::DescriptionContains => BASIC_DESCRIPTION,
            MatchReason::Keyword => BASIC_OTHER,
        };
        if pkg.installed {
            score *= BASIC_INSTALLED_BOOST;
        }
        if native_source == Some(pkg.source.as_str()) {
            score *= BASIC_NATIVE_BOOST;
        }
        (score, reason)
    }

    /// What: Rank packages matching `query`.
    ///
    /// Inputs:
    /// - `query`: search string
    /// - `opts`: limit, source filter, installed-only, native-first
    ///
    /// Output:
    /// - `Vec<SearchResult>` sorted by descending score, truncated to
    ///   `opts.limit` (`0` means unlimited)
    ///
    /// Details:
    /// - Cold path (index empty): scores every live result with the fixed
    ///   basic-score table
    /// - Warm path: queries the index at `limit * 2`, fans the same query
    ///   out live, and merges in any live-only package (scaled by
    ///   `LIVE_ONLY_SCALE`) that the index doesn't already know about
    pub async fn search(&self, query: &str, opts: &EngineSearchOptions) -> Vec<SearchResult> {
        if !self.is_ready() {
            let native = self.native_source_name().await;
            let live = self.live_search(query, opts).await;
            let mut results: Vec<SearchResult> = live
                .into_iter()
                .map(|pkg| {
                    let (score, match_reason) = Self::basic_score(&pkg, query, native.as_deref());
                    SearchResult { package: pkg, score, match_reason }
                })
                .collect();
            results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
            if opts.limit > 0 {
                results.truncate(opts.limit);
            }
            return results;
        }

        let index_opts = IndexSearchOptions {
            source_filter: opts.source_filter.clone(),
            installed_only: opts.installed_only,
            boost_installed: true,
            limit: if opts.limit > 0 { opts.limit * 2 } else { 0 },
        };
        let mut indexed = self.index.search(query, &index_opts);
        let native = self.native_source_name().await;
        self.index.set_native_source(native.clone());

        let live = self.live_search(query, opts).await;
        let known: std::collections::HashSet<(String, String)> =
            indexed.iter().map(|r| (r.package.source.clone(), r.package.name.to_lowercase())).collect();
        for pkg in live {
            let key = (pkg.source.clone(), pkg.name.to_lowercase());
            if known.contains(&key) {
                continue;
            }
            let (score, match_reason) = Self::basic_score(&pkg, query, native.as_deref());
            indexed.push(SearchResult { package: pkg, score: score * LIVE_ONLY_SCALE, match_reason });
        }

        indexed.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        if opts.limit > 0 {
            indexed.truncate(opts.limit);
        }
        indexed
    }

    /// Resolve a query through the mapping store first: if it names a known
    /// canonical package, search using each source's own name for it.
    #[must_use]
    pub fn resolve_canonical(&self, query: &str) -> Option<String> {
        self.mappings.get_by_canonical(query).map(|entry| entry.canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    fn pkg(name: &str, source: &str, installed: bool) -> Package {
        Package {
            name: name.to_string(),
            version: "1.0".to_string(),
            description: String::new(),
            source: source.to_string(),
            installed,
            size: None,
        }
    }

    #[tokio::test]
    async fn warm_index_search_ranks_exact_match_first() {
        let registry = Arc::new(Registry::default());
        let index = Arc::new(TfIdfIndex::new());
        index.add_batch(vec![pkg("firefox", "pacman", true), pkg("firefox-esr", "pacman", false)]);
        let mappings = Arc::new(MappingStore::empty());
        let engine = SearchEngine::new(registry, index, mappings);
        assert!(engine.is_ready());
        let results = engine.search("firefox", &EngineSearchOptions::default()).await;
        assert_eq!(results[0].package.name, "firefox");
    }

    #[tokio::test]
    async fn cold_index_falls_back_to_basic_scoring() {
        let registry = Arc::new(Registry::default());
        let index = Arc::new(TfIdfIndex::new());
        let mappings = Arc::new(MappingStore::empty());
        let engine = SearchEngine::new(registry, index, mappings);
        assert!(!engine.is_ready());
        let results = engine.search("nothing-registered", &EngineSearchOptions::default()).await;
        assert!(results.is_empty());
    }
}
