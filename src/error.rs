//! Unified error type for poxy-core.

use thiserror::Error;

/// Packages implicated in a pacman dependency conflict, plus a suggested fix.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DependencyConflictInfo {
    /// Raw stderr text the conflict was parsed from.
    pub raw: String,
    /// Package names implicated in the conflict.
    pub packages: Vec<String>,
    /// Human-readable suggestion (mentions "upgrade").
    pub suggestion: String,
}

/// Unified error type for all poxy-core operations.
///
/// Covers every failure mode across the Manager abstraction, the Registry,
/// the Execution Layer, the Native AUR pipeline, and the Search/Snapshot
/// engines -- one kind per row of the spec's error taxonomy.
#[derive(Error, Debug)]
pub enum PoxyError {
    /// Network or HTTP request error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error from a persistence layer or subprocess.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Custom parsing error with message.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Rate limiting error with optional retry-after information.
    #[error("Rate limited by server{0}", .retry_after.map(|s| format!(" (retry after {s}s)")).unwrap_or_default())]
    RateLimited {
        /// Optional retry-after value in seconds from server.
        retry_after: Option<u64>,
    },

    /// No registered backend can satisfy the request.
    #[error("No manager available: {0}")]
    NoManagerAvailable(String),

    /// A user-specified source string does not resolve to any backend.
    #[error("Unknown source: {0}")]
    UnknownSource(String),

    /// A resolved backend's binary is not present on PATH.
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// The backend reports the package does not exist.
    #[error("Package not found: {0}")]
    PackageNotFound(String),

    /// Pacman transaction could not satisfy dependencies, or two packages conflict.
    #[error("Dependency conflict: {}", .0.suggestion)]
    DependencyConflict(DependencyConflictInfo),

    /// Pacman's local database is locked by another process.
    #[error("Database locked: {0}")]
    DatabaseLocked(String),

    /// The operation needs root privileges and cannot elevate.
    #[error("Privilege required: {0}")]
    PrivilegeRequired(String),

    /// The sandbox itself (namespaces, mounts) failed to set up.
    #[error("Sandbox setup failed: {0}")]
    SandboxSetupFailed(String),

    /// A command running inside the sandbox exited non-zero.
    #[error("Sandboxed command failed (exit {code:?}): {stderr}")]
    SandboxedCommandFailed {
        /// Process exit code, if any.
        code: Option<i32>,
        /// Captured stderr.
        stderr: String,
    },

    /// A backend's CLI exited non-zero for reasons not otherwise classified.
    #[error("Backend execution failed (exit {code:?}): {stderr}")]
    BackendExecutionFailed {
        /// Process exit code, if any.
        code: Option<i32>,
        /// Captured stderr.
        stderr: String,
    },

    /// The AUR RPC endpoint returned a non-200 status or an `error` field.
    #[error("AUR API error: {0}")]
    AurApiError(String),

    /// A snapshot ID does not resolve to any stored snapshot.
    #[error("Snapshot not found: {0}")]
    SnapshotNotFound(String),

    /// Not enough snapshots exist to perform the requested operation (e.g. undo).
    #[error("Not enough snapshots: need {needed}, have {have}")]
    NotEnoughSnapshots {
        /// Number of snapshots required.
        needed: usize,
        /// Number of snapshots actually stored.
        have: usize,
    },

    /// The user declined a confirmation prompt; not a failure.
    #[error("Operation aborted by user")]
    OperationAborted,

    /// Package not found (legacy alias kept for the AUR info/search paths).
    #[error("Package not found")]
    NotFound,

    /// Invalid input parameter.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An AUR RPC HTTP call failed, with the operation and query context retained.
    #[error("AUR {operation} failed for '{context}': {source}")]
    AurRequestFailed {
        /// Which AUR operation was in flight ("search", "info fetch", "PKGBUILD fetch", ...).
        operation: String,
        /// The query/package-name context of the failed request.
        context: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// A required field was empty under strict validation.
    #[error("{field} cannot be empty: {message}")]
    EmptyInput {
        /// Name of the offending field.
        field: String,
        /// Explanation of the constraint.
        message: String,
    },

    /// An input exceeded its configured maximum length.
    #[error("{field} too long: {actual_length} characters (max {max_length})")]
    InputTooLong {
        /// Name of the offending field.
        field: String,
        /// Configured maximum length.
        max_length: usize,
        /// Actual length observed.
        actual_length: usize,
    },

    /// A package name failed PKGBUILD naming validation.
    #[error("invalid package name '{name}': {reason}")]
    InvalidPackageName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl PoxyError {
    /// Build a `DependencyConflict` error from raw stderr, affected packages, and a suggestion.
    #[must_use]
    pub fn dependency_conflict(
        raw: impl Into<String>,
        packages: Vec<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::DependencyConflict(DependencyConflictInfo {
            raw: raw.into(),
            packages,
            suggestion: suggestion.into(),
        })
    }

    /// Build a `BackendExecutionFailed` error from a process exit and captured stderr.
    #[must_use]
    pub fn backend_execution_failed(code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self::BackendExecutionFailed {
            code,
            stderr: stderr.into(),
        }
    }

    /// Build an `AurRequestFailed` error for a failed search request.
    #[must_use]
    pub fn search_failed(query: impl Into<String>, source: reqwest::Error) -> Self {
        Self::AurRequestFailed {
            operation: "search".to_string(),
            context: query.into(),
            source,
        }
    }

    /// Build an `AurRequestFailed` error for a failed info request.
    #[must_use]
    pub fn info_failed(names: &[&str], source: reqwest::Error) -> Self {
        Self::AurRequestFailed {
            operation: "info fetch".to_string(),
            context: names.join(", "),
            source,
        }
    }

    /// Build an `AurRequestFailed` error for a failed PKGBUILD request.
    #[must_use]
    pub fn pkgbuild_failed(package: impl Into<String>, source: reqwest::Error) -> Self {
        Self::AurRequestFailed {
            operation: "PKGBUILD fetch".to_string(),
            context: package.into(),
            source,
        }
    }
}

/// Result type alias for poxy-core operations.
pub type Result<T> = std::result::Result<T, PoxyError>;
