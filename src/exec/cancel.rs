//! Cooperative cancellation for in-flight [`super::Executor`] calls.

use crate::error::{PoxyError, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Notify;

/// A cancellation context passed into every long-running Executor operation.
///
/// Cloning shares the same underlying signal; calling [`CancelToken::cancel`]
/// on any clone wakes every in-flight [`CancelToken::race`] call.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    notify: Arc<Notify>,
    cancelled: Arc<std::sync::atomic::AtomicBool>,
}

impl CancelToken {
    /// Build a fresh, not-yet-cancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation to every in-flight [`CancelToken::race`] call.
    pub fn cancel(&self) {
        self.cancelled
            .store(true, std::sync::atomic::Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    /// Whether [`CancelToken::cancel`] has already been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Race `fut` against cancellation. On cancellation, `fut` is dropped
    /// (which kills the child process when the command was built with
    /// `kill_on_drop(true)`) and an I/O "interrupted" error is returned.
    ///
    /// # Errors
    /// Returns [`PoxyError::Io`] if the token was cancelled before `fut` resolved.
    pub async fn race<F: Future>(&self, fut: F) -> Result<F::Output> {
        if self.is_cancelled() {
            return Err(cancelled_error());
        }
        tokio::select! {
            biased;
            () = self.notify.notified(), if !self.is_cancelled() => Err(cancelled_error()),
            output = fut => Ok(output),
        }
    }
}

fn cancelled_error() -> PoxyError {
    PoxyError::Io(std::io::Error::new(
        std::io::ErrorKind::Interrupted,
        "operation cancelled",
    ))
}
