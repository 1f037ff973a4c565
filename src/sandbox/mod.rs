//! User-namespace build jail, fronting a `bwrap`-style helper binary.
//!
//! The sandbox itself does not call `unshare(2)`/`mount(2)` directly; it
//! renders a [`Profile`] into `bwrap` flags and runs the helper through the
//! same [`crate::exec::Executor`] every backend adapter uses.

mod profile;

pub use profile::Profile;

use crate::error::{PoxyError, Result};
use crate::exec::{CancelToken, Executor};

const HELPER_BINARY: &str = "bwrap";

/// What: A namespace-isolation jail for running untrusted build scripts.
///
/// Inputs: None (constructed via `Sandbox::new`)
///
/// Output: `Sandbox` instance ready for `run`/`run_output`
///
/// Details:
/// - Does not call `unshare(2)`/`mount(2)` itself; renders a [`Profile`]
///   into `bwrap` argv and runs the helper through the shared `Executor`
#[derive(Clone, Copy, Debug, Default)]
pub struct Sandbox {
    executor: Executor,
}

impl Sandbox {
    /// Build a sandbox that runs commands through `executor`.
    #[must_use]
    pub const fn new(executor: Executor) -> Self {
        Self { executor }
    }

    /// Whether the `bwrap` helper binary exists on PATH.
    #[must_use]
    pub fn is_available() -> bool {
        which::which(HELPER_BINARY).is_ok()
    }

    /// Run `program`/`args` inside `profile`, inheriting stdio.
    ///
    /// # Errors
    /// Returns [`PoxyError::SandboxSetupFailed`] if `bwrap` itself failed to
    /// construct the jail, or [`PoxyError::SandboxedCommandFailed`] if the
    /// sandboxed command ran and exited non-zero.
    pub async fn run(
        &self,
        cancel: &CancelToken,
        profile: &Profile,
        program: &str,
        args: &[&str],
    ) -> Result<()> {
        let captured = self.run_output(cancel, profile, program, args).await;
        captured.map(|_| ())
    }

    /// What: Run `program`/`args` inside `profile`.
    ///
    /// Inputs:
    /// - `cancel`: cooperative cancellation handle
    /// - `profile`: bwrap profile to run inside
    /// - `program`, `args`: command to run
    ///
    /// Output:
    /// - `Result<String>` with stdout+stderr combined
    ///
    /// Details:
    /// - Classifies a non-zero exit by stderr's `"bwrap:"` prefix into
    ///   `SandboxSetupFailed` (jail construction failed) vs
    ///   `SandboxedCommandFailed` (the sandboxed command itself failed)
    ///
    /// # Errors
    /// Same as [`Sandbox::run`].
    pub async fn run_output(
        &self,
        cancel: &CancelToken,
        profile: &Profile,
        program: &str,
        args: &[&str],
    ) -> Result<String> {
        if !Self::is_available() {
            return Err(PoxyError::SandboxSetupFailed(format!(
                "{HELPER_BINARY} not found on PATH"
            )));
        }
        let mut owned: Vec<String> = profile.to_bwrap_args();
        owned.push(program.to_string());
        owned.extend(args.iter().map(|s| (*s).to_string()));
        let arg_refs: Vec<&str> = owned.iter().map(String::as_str).collect();

        match self
            .executor
            .output_combined(cancel, HELPER_BINARY, &arg_refs)
            .await
        {
            Ok(captured) => Ok(captured),
            Err(PoxyError::BackendExecutionFailed { code, stderr }) => {
                if is_bwrap_setup_failure(&stderr) {
                    Err(PoxyError::SandboxSetupFailed(stderr))
                } else {
                    Err(PoxyError::SandboxedCommandFailed { code, stderr })
                }
            }
            Err(other) => Err(other),
        }
    }
}

/// `bwrap` prefixes its own diagnostics with `"bwrap: "`; the sandboxed
/// command's own stderr never does, so this line is a reliable discriminator
/// between "the jail failed to construct" and "the command inside it failed".
fn is_bwrap_setup_failure(stderr: &str) -> bool {
    stderr.lines().any(|line| line.trim_start().starts_with("bwrap:"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_bwrap_diagnostic_prefix() {
        assert!(is_bwrap_setup_failure(
            "bwrap: Can't mkdir /newroot/usr: Permission denied\n"
        ));
        assert!(!is_bwrap_setup_failure(
            "make: *** [Makefile:10: all] Error 2\n"
        ));
    }
}
