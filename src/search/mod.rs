//! Ranked search: a TF-IDF inverted index, a canonical-name mapping store,
//! and a fused search engine layering both over the live [`crate::registry::Registry`].

pub mod engine;
pub mod index;
pub mod index_builder;
pub mod mapping;

pub use engine::SearchEngine;
pub use index::{Boosts, TfIdfIndex};
pub use index_builder::IndexBuilder;
pub use mapping::MappingStore;

use crate::manager::Package;
use serde::{Deserialize, Serialize};

/// Why a particular result matched the query; also determines the priority
/// order used to pick a single reason when several would apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchReason {
    /// The package name matches the query exactly (case-insensitive).
    ExactName,
    /// The package name starts with the query.
    NamePrefix,
    /// The package name contains the query as a substring.
    NameContains,
    /// The description contains the query as a substring.
    DescriptionContains,
    /// Matched via the TF-IDF token overlap, not a literal name/description hit.
    Keyword,
}

impl MatchReason {
    /// Human-readable label, e.g. for a result list's "why" column.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ExactName => "Exact name match",
            Self::NamePrefix => "Name prefix match",
            Self::NameContains => "Name contains query",
            Self::DescriptionContains => "Description contains query",
            Self::Keyword => "Keyword match",
        }
    }
}

/// One ranked search hit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResult {
    /// The matched package.
    pub package: Package,
    /// Ranking score; higher is more relevant. Not normalized across
    /// queries or comparable between the indexed and live-search paths
    /// before [`engine::SearchEngine`]'s 0.8 live-only scaling is applied.
    pub score: f64,
    /// Why this result matched.
    pub match_reason: MatchReason,
}

/// What: Classify how `name` relates to `query`.
///
/// Inputs:
/// - `name`: package name to classify
/// - `query`: search query, compared case-insensitively
///
/// Output:
/// - `Option<MatchReason>`, the most specific applicable reason among the
///   name-based variants, or `None` if `name` doesn't contain `query` at all
#[must_use]
pub fn name_match_reason(name: &str, query: &str) -> Option<MatchReason> {
    let name_lower = name.to_lowercase();
    let query_lower = query.to_lowercase();
    if name_lower == query_lower {
        Some(MatchReason::ExactName)
    } else if name_lower.starts_with(&query_lower) {
        Some(MatchReason::NamePrefix)
    } else if name_lower.contains(&query_lower) {
        Some(MatchReason::NameContains)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_match_reason_picks_the_most_specific_rule() {
        assert_eq!(name_match_reason("Firefox", "firefox"), Some(MatchReason::ExactName));
        assert_eq!(name_match_reason("firefox-esr", "firefox"), Some(MatchReason::NamePrefix));
        assert_eq!(name_match_reason("org.mozilla.firefox", "firefox"), Some(MatchReason::NameContains));
        assert_eq!(name_match_reason("chromium", "firefox"), None);
    }
}
