//! Uniform external-command execution: dry-run, privilege escalation, and
//! interleaved stdout/stderr capture.
//!
//! Every backend adapter spawns its CLI through an [`Executor`] rather than
//! calling `std::process`/`tokio::process` directly, so dry-run and
//! cancellation behave identically everywhere.

mod cancel;
mod privilege;

pub use cancel::CancelToken;
pub use privilege::{has_sudo, is_root};

use crate::error::{PoxyError, Result};
use std::process::Stdio;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;

/// Captured output of a command that tees stdout and/or stderr.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Captured {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

/// Runs external commands on behalf of backend adapters.
///
/// `dry_run` short-circuits every spawning operation into a single logged
/// line; `verbose` additionally logs the command line before running it.
#[derive(Clone, Copy, Debug, Default)]
pub struct Executor {
    dry_run: bool,
    verbose: bool,
}

impl Executor {
    /// Build an executor that runs commands for real.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dry_run: false,
            verbose: false,
        }
    }

    /// Set whether commands are actually spawned or only logged.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set whether the command line is logged before running.
    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Whether this executor is in dry-run mode.
    #[must_use]
    pub const fn dry_run(&self) -> bool {
        self.dry_run
    }

    fn announce(&self, program: &str, args: &[&str]) {
        if self.dry_run {
            println!("[dry-run] Would execute: {program} {}", args.join(" "));
        } else if self.verbose {
            tracing::debug!(program, ?args, "executing");
        }
    }

    fn elevate<'a>(&self, program: &'a str, args: &'a [&'a str]) -> Result<(String, Vec<String>)> {
        if is_root() {
            return Ok((program.to_string(), args.iter().map(|s| (*s).to_string()).collect()));
        }
        if !has_sudo() {
            return Err(PoxyError::PrivilegeRequired(format!(
                "{program} requires root privileges and no sudo-equivalent was found on PATH"
            )));
        }
        let sudo = privilege::sudo_binary_name();
        let mut full = vec![program.to_string()];
        full.extend(args.iter().map(|s| (*s).to_string()));
        Ok((sudo.to_string(), full))
    }

    /// Run a command, inheriting stdio.
    ///
    /// # Errors
    /// Returns [`PoxyError::BackendExecutionFailed`] on non-zero exit, or
    /// [`PoxyError::Io`] if the process could not be spawned.
    pub async fn run(&self, cancel: &CancelToken, program: &str, args: &[&str]) -> Result<()> {
        self.announce(program, args);
        if self.dry_run {
            return Ok(());
        }
        let status = cancel
            .race(Command::new(program).args(args).kill_on_drop(true).status())
            .await??;
        if status.success() {
            Ok(())
        } else {
            Err(PoxyError::backend_execution_failed(status.code(), String::new()))
        }
    }

    /// Run a command with its working directory set to `dir`, inheriting stdio.
    ///
    /// # Errors
    /// Same as [`Executor::run`].
    pub async fn run_in_dir(
        &self,
        cancel: &CancelToken,
        dir: &std::path::Path,
        program: &str,
        args: &[&str],
    ) -> Result<()> {
        self.announce(program, args);
        if self.dry_run {
            return Ok(());
        }
        let status = cancel
            .race(Command::new(program).args(args).current_dir(dir).kill_on_drop(true).status())
            .await??;
        if status.success() {
            Ok(())
        } else {
            Err(PoxyError::backend_execution_failed(status.code(), String::new()))
        }
    }

    /// Run a command with sudo elevation when not already root.
    ///
    /// # Errors
    /// Returns [`PoxyError::PrivilegeRequired`] if elevation is unavailable,
    /// or [`PoxyError::BackendExecutionFailed`] on non-zero exit.
    pub async fn run_sudo(&self, cancel: &CancelToken, program: &str, args: &[&str]) -> Result<()> {
        if self.dry_run {
            self.announce(program, args);
            return Ok(());
        }
        let (bin, full_args) = self.elevate(program, args)?;
        let arg_refs: Vec<&str> = full_args.iter().map(String::as_str).collect();
        self.run(cancel, &bin, &arg_refs).await
    }

    /// Like [`Executor::run_sudo`] but tees stderr into an in-memory buffer
    /// while still streaming it to the terminal, returning the captured text.
    ///
    /// # Errors
    /// Same as [`Executor::run_sudo`].
    pub async fn run_sudo_with_stderr(
        &self,
        cancel: &CancelToken,
        program: &str,
        args: &[&str],
    ) -> Result<String> {
        if self.dry_run {
            self.announce(program, args);
            return Ok(String::new());
        }
        let (bin, full_args) = self.elevate(program, args)?;
        let mut child = Command::new(&bin)
            .args(&full_args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;
        let mut stderr_pipe = child.stderr.take().expect("stderr was piped");
        let mut captured = String::new();
        let mut chunk = [0_u8; 4096];
        let mut eprinter = tokio::io::stderr();
        loop {
            let n = stderr_pipe.read(&mut chunk).await?;
            if n == 0 {
                break;
            }
            captured.push_str(&String::from_utf8_lossy(&chunk[..n]));
            eprinter.write_all(&chunk[..n]).await?;
        }
        let status = cancel.race(child.wait()).await??;
        if status.success() {
            Ok(captured)
        } else {
            Err(PoxyError::backend_execution_failed(status.code(), captured))
        }
    }

    /// Run a command and return its stdout; stderr is inherited.
    ///
    /// # Errors
    /// Returns [`PoxyError::BackendExecutionFailed`] on non-zero exit.
    pub async fn output(&self, cancel: &CancelToken, program: &str, args: &[&str]) -> Result<String> {
        self.announce(program, args);
        if self.dry_run {
            return Ok(String::new());
        }
        let output = cancel
            .race(
                Command::new(program)
                    .args(args)
                    .stderr(Stdio::inherit())
                    .kill_on_drop(true)
                    .output(),
            )
            .await??;
        Self::stdout_or_fail(output)
    }

    /// Like [`Executor::output`] but suppresses stderr entirely.
    ///
    /// # Errors
    /// Returns [`PoxyError::BackendExecutionFailed`] on non-zero exit.
    pub async fn output_quiet(
        &self,
        cancel: &CancelToken,
        program: &str,
        args: &[&str],
    ) -> Result<String> {
        self.announce(program, args);
        if self.dry_run {
            return Ok(String::new());
        }
        let output = cancel
            .race(
                Command::new(program)
                    .args(args)
                    .stderr(Stdio::null())
                    .kill_on_drop(true)
                    .output(),
            )
            .await??;
        Self::stdout_or_fail(output)
    }

    /// `run_sudo` variant that captures and returns stdout.
    ///
    /// # Errors
    /// Same as [`Executor::run_sudo`].
    pub async fn output_sudo(
        &self,
        cancel: &CancelToken,
        program: &str,
        args: &[&str],
    ) -> Result<String> {
        if self.dry_run {
            self.announce(program, args);
            return Ok(String::new());
        }
        let (bin, full_args) = self.elevate(program, args)?;
        let arg_refs: Vec<&str> = full_args.iter().map(String::as_str).collect();
        self.output(cancel, &bin, &arg_refs).await
    }

    /// Run a command and return stdout and stderr merged into one string.
    ///
    /// # Errors
    /// Returns [`PoxyError::BackendExecutionFailed`] on non-zero exit.
    pub async fn output_combined(
        &self,
        cancel: &CancelToken,
        program: &str,
        args: &[&str],
    ) -> Result<String> {
        self.announce(program, args);
        if self.dry_run {
            return Ok(String::new());
        }
        let output = cancel
            .race(Command::new(program).args(args).kill_on_drop(true).output())
            .await??;
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        if output.status.success() {
            Ok(combined)
        } else {
            Err(PoxyError::backend_execution_failed(
                output.status.code(),
                combined,
            ))
        }
    }

    /// Run a command with inherited stdio, also capturing stdout into a buffer.
    ///
    /// # Errors
    /// Returns [`PoxyError::BackendExecutionFailed`] on non-zero exit.
    pub async fn run_with_output(
        &self,
        cancel: &CancelToken,
        program: &str,
        args: &[&str],
    ) -> Result<Captured> {
        self.announce(program, args);
        if self.dry_run {
            return Ok(Captured::default());
        }
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;
        let mut stdout_pipe = child.stdout.take().expect("stdout was piped");
        let mut stderr_pipe = child.stderr.take().expect("stderr was piped");
        let mut stdout = String::new();
        let mut stderr = String::new();
        let (stdout_res, stderr_res) = tokio::join!(
            stdout_pipe.read_to_string(&mut stdout),
            stderr_pipe.read_to_string(&mut stderr),
        );
        stdout_res?;
        stderr_res?;
        let status = cancel.race(child.wait()).await??;
        if status.success() {
            Ok(Captured { stdout, stderr })
        } else {
            Err(PoxyError::backend_execution_failed(status.code(), stderr))
        }
    }

    fn stdout_or_fail(output: std::process::Output) -> Result<String> {
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(PoxyError::backend_execution_failed(
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dry_run_does_not_spawn() {
        let executor = Executor::new().with_dry_run(true);
        let cancel = CancelToken::new();
        let out = executor
            .output(&cancel, "definitely-not-a-real-binary", &["--version"])
            .await
            .expect("dry-run never spawns, so it never fails");
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn run_reports_nonzero_exit() {
        let executor = Executor::new();
        let cancel = CancelToken::new();
        let err = executor
            .run(&cancel, "false", &[])
            .await
            .expect_err("`false` always exits non-zero");
        assert!(matches!(err, PoxyError::BackendExecutionFailed { .. }));
    }

    #[tokio::test]
    async fn output_captures_stdout() {
        let executor = Executor::new();
        let cancel = CancelToken::new();
        let out = executor
            .output(&cancel, "echo", &["hello"])
            .await
            .expect("echo always succeeds");
        assert_eq!(out.trim(), "hello");
    }
}
