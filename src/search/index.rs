//! In-memory TF-IDF inverted index with concurrent read access.

use crate::manager::Package;
use crate::search::{name_match_reason, MatchReason, SearchResult};
use crate::store::tokenize;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// Multiplicative score boosts applied after the raw cosine-similarity score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Boosts {
    /// Exact (case-insensitive, whole-string) name match.
    pub exact: f64,
    /// Name starts with the query.
    pub prefix: f64,
    /// Installed, when the search requests the installed boost.
    pub installed: f64,
    /// Source equals the index's configured native source.
    pub native: f64,
}

impl Default for Boosts {
    fn default() -> Self {
        Self { exact: 10.0, prefix: 5.0, installed: 1.5, native: 1.2 }
    }
}

/// Name-contains boost; unlike the others this one isn't configurable.
const NAME_CONTAINS_BOOST: f64 = 2.0;

/// Search-time options for [`TfIdfIndex::search`].
#[derive(Clone, Debug, Default)]
pub struct IndexSearchOptions {
    /// Drop results whose source doesn't equal this filter.
    pub source_filter: Option<String>,
    /// Drop results that aren't currently installed.
    pub installed_only: bool,
    /// Apply the installed-package boost to installed results.
    pub boost_installed: bool,
    /// Maximum results to return; `0` means unlimited.
    pub limit: usize,
}

#[derive(Debug)]
struct Document {
    package: Package,
    term_tf: HashMap<String, u32>,
    /// `sqrt(sum of (tf(t) * idf[t])^2)` over every term in this document,
    /// recomputed whenever the index's IDF cache is recomputed.
    norm: f64,
}

/// What: In-memory, single-writer/many-reader inverted index over cached
/// packages, ranked by TF-IDF cosine similarity with post-hoc boosts.
///
/// Inputs: None (constructed via `TfIdfIndex::new`, populated via `add_batch`)
///
/// Output: `TfIdfIndex` instance ready for `search`
///
/// Details:
/// - Guards all mutable state behind one `RwLock<Inner>`
/// - Tombstones removed documents instead of compacting `docs`, so existing
///   indices into `key_to_doc`/`postings` stay valid
#[derive(Debug, Default)]
pub struct TfIdfIndex {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    docs: Vec<Option<Document>>,
    key_to_doc: HashMap<(String, String), usize>,
    postings: HashMap<String, HashSet<usize>>,
    idf: HashMap<String, f64>,
    boosts: Boosts,
    native_source: Option<String>,
}

impl TfIdfIndex {
    /// An empty index with default boosts and no configured native source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokens making up a document's text: the shared tokenizer over
    /// `name + description`, plus `__name:<lowercase name>`, with tokens
    /// shorter than two characters dropped.
    fn document_tokens(pkg: &Package) -> Vec<String> {
        let text = format!("{} {}", pkg.name, pkg.description);
        let mut tokens: Vec<String> = tokenize(&text).into_iter().filter(|t| t.len() >= 2).collect();
        tokens.push(format!("__name:{}", pkg.name.to_lowercase()));
        tokens
    }

    /// Insert or replace one package.
    pub fn add(&self, pkg: Package) {
        self.add_batch(vec![pkg]);
    }

    /// What: Insert or replace a batch of packages.
    ///
    /// Inputs:
    /// - `pkgs`: packages to index, keyed by `(source, lowercase name)`
    ///
    /// Output: None (mutates the index in place)
    ///
    /// Details:
    /// - Recomputes the IDF cache and every document's norm over the whole
    ///   corpus afterward, so scores stay consistent with the new corpus
    ///   size
    pub fn add_batch(&self, pkgs: Vec<Package>) {
        let mut inner = self.lock_mut();
        for pkg in pkgs {
            let key = (pkg.source.clone(), pkg.name.to_lowercase());
            let mut term_tf = HashMap::new();
            for token in Self::document_tokens(&pkg) {
                *term_tf.entry(token).or_insert(0) += 1;
            }
            let doc = Document { package: pkg, term_tf, norm: 0.0 };
            if let Some(&idx) = inner.key_to_doc.get(&key) {
                Self::remove_postings(&mut inner.postings, idx, &inner.docs[idx]);
                inner.docs[idx] = Some(doc);
            } else {
                let idx = inner.docs.len();
                inner.docs.push(Some(doc));
                inner.key_to_doc.insert(key, idx);
            }
        }
        Self::reindex_postings_and_idf(&mut inner);
    }

    fn remove_postings(postings: &mut HashMap<String, HashSet<usize>>, idx: usize, old: &Option<Document>) {
        if let Some(doc) = old {
            for term in doc.term_tf.keys() {
                if let Some(set) = postings.get_mut(term) {
                    set.remove(&idx);
                }
            }
        }
    }

    fn reindex_postings_and_idf(inner: &mut Inner) {
        inner.postings.clear();
        let mut df: HashMap<String, usize> = HashMap::new();
        for (idx, doc) in inner.docs.iter().enumerate() {
            let Some(doc) = doc else { continue };
            for term in doc.term_tf.keys() {
                inner.postings.entry(term.clone()).or_default().insert(idx);
                *df.entry(term.clone()).or_insert(0) += 1;
            }
        }
        let n = inner.docs.iter().filter(|d| d.is_some()).count().max(1) as f64;
        inner.idf = df.into_iter().map(|(term, count)| (term, (n / count as f64).ln())).collect();

        for doc in inner.docs.iter_mut().flatten() {
            let sum_sq: f64 = doc
                .term_tf
                .iter()
                .map(|(term, tf)| {
                    let weight = f64::from(*tf) * inner.idf.get(term).copied().unwrap_or(0.0);
                    weight * weight
                })
                .sum();
            doc.norm = sum_sq.sqrt();
        }
    }

    /// Remove one document by `(source, name)`. A missing entry is a no-op.
    /// The vacated slot is left as a tombstone; reindexing is not required.
    pub fn remove(&self, source: &str, name: &str) {
        let mut inner = self.lock_mut();
        let key = (source.to_string(), name.to_lowercase());
        if let Some(idx) = inner.key_to_doc.remove(&key) {
            Self::remove_postings(&mut inner.postings, idx, &inner.docs[idx]);
            inner.docs[idx] = None;
        }
    }

    /// Remove every document.
    pub fn clear(&self) {
        let mut inner = self.lock_mut();
        *inner = Inner { boosts: inner.boosts, native_source: inner.native_source.clone(), ..Inner::default() };
    }

    /// Number of live (non-tombstoned) documents.
    #[must_use]
    pub fn size(&self) -> usize {
        self.lock_ref().docs.iter().filter(|d| d.is_some()).count()
    }

    /// Replace the configured boost multipliers.
    pub fn set_boosts(&self, boosts: Boosts) {
        self.lock_mut().boosts = boosts;
    }

    /// Configure which source is treated as "native" for the native boost.
    pub fn set_native_source(&self, source: Option<String>) {
        self.lock_mut().native_source = source;
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

    /// What: Rank documents against `query`.
    ///
    /// Inputs:
    /// - `query`: search string
    /// - `opts`: source/installed filters, installed boost toggle, limit
    ///
    /// Output:
    /// - `Vec<SearchResult>` sorted by descending score, truncated to
    ///   `opts.limit` (`0` means unlimited)
    ///
    /// Details:
    /// - Candidate set comes from exact-name and name-prefix postings only;
    ///   scoring is cosine similarity over TF-IDF weights
    /// - Boosts apply in order: exact name, name-prefix, name-contains,
    ///   installed, native source
    #[must_use]
    pub fn search(&self, query: &str, opts: &IndexSearchOptions) -> Vec<SearchResult> {
        let inner = self.lock_ref();
        let query_terms: Vec<String> = tokenize(query).into_iter().filter(|t| t.len() >= 2).collect();
        if query_terms.is_empty() {
            return Vec::new();
        }

        let mut query_tf: HashMap<&str, u32> = HashMap::new();
        for term in &query_terms {
            *query_tf.entry(term.as_str()).or_insert(0) += 1;
        }

        let mut candidates: HashSet<usize> = HashSet::new();
        for term in &query_terms {
            if let Some(ids) = inner.postings.get(term) {
                candidates.extend(ids);
            }
            for (key, ids) in &inner.postings {
                if key.starts_with(term.as_str()) {
                    candidates.extend(ids);
                }
            }
        }

        let mut results = Vec::new();
        for idx in candidates {
            let Some(doc) = &inner.docs[idx] else { continue };
            if let Some(filter) = &opts.source_filter {
                if &doc.package.source != filter {
                    continue;
                }
            }
            if opts.installed_only && !doc.package.installed {
                continue;
            }

            let dot: f64 = query_tf
                .iter()
                .filter_map(|(term, qtf)| {
                    let idf = inner.idf.get(*term).copied()?;
                    let dtf = doc.term_tf.get(*term).copied()?;
                    Some(f64::from(*qtf) * idf * f64::from(dtf) * idf)
                })
                .sum();
            let mut score = if doc.norm == 0.0 { 0.0 } else { dot / doc.norm };

            let reason = name_match_reason(&doc.package.name, query).unwrap_or_else(|| {
                if doc.package.description.to_lowercase().contains(&query.to_lowercase()) {
                    MatchReason::DescriptionContains
                } else {
                    MatchReason::Keyword
                }
            });

            score *= match reason {
                MatchReason::ExactName => inner.boosts.exact,
                MatchReason::NamePrefix => inner.boosts.prefix,
                MatchReason::NameContains => NAME_CONTAINS_BOOST,
                MatchReason::DescriptionContains | MatchReason::Keyword => 1.0,
            };
            if doc.package.installed && opts.boost_installed {
                score *= inner.boosts.installed;
            }
            if inner.native_source.as_deref() == Some(doc.package.source.as_str()) {
                score *= inner.boosts.native;
            }

            results.push(SearchResult { package: doc.package.clone(), score, match_reason: reason });
        }

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        if opts.limit > 0 {
            results.truncate(opts.limit);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn exact_match_ranks_first_within_its_source() {
        let index = TfIdfIndex::new();
        index.add_batch(vec![pkg("firefox", "pacman", false), pkg("firefox-esr", "pacman", false)]);
        let results = index.search("firefox", &IndexSearchOptions::default());
        assert_eq!(results[0].package.name, "firefox");
        assert_eq!(results[0].match_reason, MatchReason::ExactName);
    }

    #[test]
    fn idf_matches_the_n_over_df_law() {
        let index = TfIdfIndex::new();
        index.add_batch(vec![
            pkg("firefox", "pacman", false),
            pkg("firefox-esr", "pacman", false),
            pkg("chromium", "pacman", false),
        ]);
        let inner = index.lock_ref();
        let idf_firefox = inner.idf[&"firefox".to_string()];
        assert!((idf_firefox - (3.0_f64 / 2.0).ln()).abs() < 1e-9);
    }

    #[test]
    fn boost_ordering_prefers_exact_then_prefix_then_contains() {
        let index = TfIdfIndex::new();
        index.set_native_source(Some("pacman".to_string()));
        index.add_batch(vec![
            pkg("firefox", "pacman", false),
            pkg("firefox-esr", "pacman", false),
            pkg("org.mozilla.firefox", "flatpak", false),
        ]);
        let results = index.search("firefox", &IndexSearchOptions::default());
        assert_eq!(results[0].package.name, "firefox");
        let rest: Vec<&str> = results[1..].iter().map(|r| r.package.name.as_str()).collect();
        assert!(rest.contains(&"firefox-esr"));
        assert!(rest.contains(&"org.mozilla.firefox"));
    }

    #[test]
    fn remove_drops_the_document_from_search() {
        let index = TfIdfIndex::new();
        index.add(pkg("vim", "pacman", true));
        index.remove("pacman", "vim");
        assert_eq!(index.size(), 0);
        assert!(index.search("vim", &IndexSearchOptions::default()).is_empty());
    }
}
