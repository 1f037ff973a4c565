//! Parses pacman's stderr into typed error kinds with recovery suggestions.

use crate::error::PoxyError;
use regex::Regex;
use std::sync::LazyLock;

static DEP_CONFLICT_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)failed to prepare transaction.*could not satisfy dependencies").expect("valid regex")
});
static DEP_CONFLICT_PACKAGES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r":: installing (\S+) .* breaks dependency '[^']*' required by (\S+)").expect("valid regex")
});
static TWO_WAY_CONFLICT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r":: (\S+) and (\S+) are in conflict").expect("valid regex")
});
static TARGET_NOT_FOUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"error: target not found: (\S+)").expect("valid regex")
});
static DATABASE_LOCKED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)failed to init transaction.*unable to lock database").expect("valid regex")
});

/// Classify raw pacman stderr into a typed [`PoxyError`], or `None` if none
/// of the known patterns match (callers should surface the text unchanged).
#[must_use]
pub fn classify(stderr: &str) -> Option<PoxyError> {
    if DEP_CONFLICT_HEADER.is_match(stderr) {
        let mut packages = Vec::new();
        for caps in DEP_CONFLICT_PACKAGES.captures_iter(stderr) {
            packages.push(caps[1].to_string());
            packages.push(caps[2].to_string());
        }
        packages.dedup();
        let suggestion = "Run a full system upgrade first, then retry the install.".to_string();
        return Some(PoxyError::dependency_conflict(stderr, packages, suggestion));
    }

    if let Some(caps) = TWO_WAY_CONFLICT.captures(stderr) {
        let packages = vec![caps[1].to_string(), caps[2].to_string()];
        let suggestion = format!(
            "{} and {} cannot be installed together; upgrade or remove one before retrying.",
            &caps[1], &caps[2]
        );
        return Some(PoxyError::dependency_conflict(stderr, packages, suggestion));
    }

    if TARGET_NOT_FOUND.is_match(stderr) {
        let names: Vec<String> = TARGET_NOT_FOUND
            .captures_iter(stderr)
            .map(|c| c[1].to_string())
            .collect();
        return Some(PoxyError::PackageNotFound(names.join(", ")));
    }

    if DATABASE_LOCKED.is_match(stderr) {
        return Some(PoxyError::DatabaseLocked(
            "pacman's local database is locked by another process".to_string(),
        ));
    }

    None
}

/// Classify stderr, falling back to a generic execution failure when no
/// known pattern matches.
#[must_use]
pub fn classify_or_generic(code: Option<i32>, stderr: String) -> PoxyError {
    classify(&stderr).unwrap_or_else(|| PoxyError::backend_execution_failed(code, stderr))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFLICT_STDERR: &str = "resolving dependencies...\nlooking for conflicting packages...\nerror: failed to prepare transaction (could not satisfy dependencies)\n:: installing gst-plugins-base-libs (1.26.10-3) breaks dependency 'gst-plugins-base-libs=1.26.10-1' required by gst-plugins-bad-libs\n";

    #[test]
    fn classifies_dependency_conflict_with_affected_packages() {
        let err = classify(CONFLICT_STDERR).expect("should classify");
        match err {
            PoxyError::DependencyConflict(info) => {
                assert_eq!(info.packages, vec!["gst-plugins-base-libs", "gst-plugins-bad-libs"]);
                assert!(info.suggestion.to_lowercase().contains("upgrade"));
            }
            other => panic!("expected DependencyConflict, got {other:?}"),
        }
    }

    #[test]
    fn classifies_two_way_conflict() {
        let err = classify(":: foo and bar are in conflict\n").expect("should classify");
        match err {
            PoxyError::DependencyConflict(info) => {
                assert_eq!(info.packages, vec!["foo", "bar"]);
            }
            other => panic!("expected DependencyConflict, got {other:?}"),
        }
    }

    #[test]
    fn classifies_target_not_found() {
        let err = classify("error: target not found: nonexistent-pkg\n").expect("should classify");
        assert!(matches!(err, PoxyError::PackageNotFound(name) if name == "nonexistent-pkg"));
    }

    #[test]
    fn classifies_database_locked() {
        let err = classify(
            "error: failed to init transaction (unable to lock database)\nerror: could not lock database: File exists\n",
        )
        .expect("should classify");
        assert!(matches!(err, PoxyError::DatabaseLocked(_)));
    }

    #[test]
    fn unknown_stderr_is_not_classified() {
        assert!(classify("error: some unrelated failure\n").is_none());
    }
}
