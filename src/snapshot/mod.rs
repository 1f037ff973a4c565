//! Capture/diff/restore engine over the installed-package set: diffing two
//! snapshots, capturing the current state, planning a restore, executing
//! that plan, and undoing to the previous snapshot.

pub mod capture;
pub mod differ;
pub mod executor;
pub mod planner;

#[cfg(feature = "cache-disk")]
pub mod undo;

pub use capture::capture;
pub use differ::compare;
pub use executor::execute;
pub use planner::{plan_restore, RestoreOptions, RestorePlan};

#[cfg(feature = "cache-disk")]
pub use capture::capture_and_save;
#[cfg(feature = "cache-disk")]
pub use undo::undo_target;
