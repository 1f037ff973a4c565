//! History-log data types.

use serde::{Deserialize, Serialize};

/// Kind of operation recorded in the history log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Package(s) installed.
    Install,
    /// Package(s) uninstalled.
    Uninstall,
    /// Backend metadata refreshed.
    Update,
    /// Package(s) upgraded.
    Upgrade,
    /// Backend cache cleaned.
    Clean,
}

impl Operation {
    /// The inverse of `Install`/`Uninstall`; other operations have none.
    #[must_use]
    pub const fn reverse(self) -> Option<Self> {
        match self {
            Self::Install => Some(Self::Uninstall),
            Self::Uninstall => Some(Self::Install),
            Self::Update | Self::Upgrade | Self::Clean => None,
        }
    }
}

/// A single entry in the append-only history ledger.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Timestamp-derived, sortable identifier.
    pub id: String,
    /// When the operation was recorded, RFC3339.
    pub timestamp: String,
    /// What kind of operation this was.
    pub operation: Operation,
    /// Backend the operation ran against.
    pub source: String,
    /// Packages the operation targeted.
    pub packages: Vec<String>,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error message, if the operation failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Whether this entry is eligible for rollback.
    pub reversible: bool,
    /// The operation that would undo this one, when reversible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse_op: Option<Operation>,
}

impl HistoryEntry {
    /// Build a new entry with `success = false`, filling `reversible`/`reverse_op`
    /// from the table in the data-model section (`Install`/`Uninstall` only).
    #[must_use]
    pub fn new(operation: Operation, source: impl Into<String>, packages: Vec<String>) -> Self {
        let reversible = matches!(operation, Operation::Install | Operation::Uninstall);
        Self {
            id: String::new(),
            timestamp: String::new(),
            operation,
            source: source.into(),
            packages,
            success: false,
            error: None,
            reversible,
            reverse_op: if reversible {
                operation.reverse()
            } else {
                None
            },
        }
    }

    /// Whether this entry qualifies for rollback: reversible, succeeded, non-empty.
    #[must_use]
    pub fn can_rollback(&self) -> bool {
        self.reversible && self.success && !self.packages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_op_is_install_uninstall_pair() {
        assert_eq!(Operation::Install.reverse(), Some(Operation::Uninstall));
        assert_eq!(Operation::Uninstall.reverse(), Some(Operation::Install));
        assert_eq!(Operation::Upgrade.reverse(), None);
    }

    #[test]
    fn can_rollback_requires_success_and_packages() {
        let mut entry = HistoryEntry::new(Operation::Install, "pacman", vec!["git".into()]);
        assert!(!entry.can_rollback());
        entry.success = true;
        assert!(entry.can_rollback());
        entry.packages.clear();
        assert!(!entry.can_rollback());
    }
}
