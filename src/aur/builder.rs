//! Clones/refreshes a package's PKGBUILD tree and drives `makepkg -si`,
//! optionally behind an interactive review hook and a sandbox jail.

use crate::client::AurRpcClient;
use crate::error::{PoxyError, Result};
use crate::exec::{CancelToken, Executor};
use crate::types::AurPackageDetails;
use std::path::{Path, PathBuf};

#[cfg(all(feature = "aur", feature = "sandbox-linux"))]
use crate::sandbox::{Profile, Sandbox};

/// Called with the fetched PKGBUILD text before a build proceeds; returning
/// `false` aborts the build.
pub type ReviewHook = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Options controlling one [`Builder::build_and_install`] invocation.
pub struct BuildOptions {
    /// Root directory under which each package gets its own clone.
    pub cache_dir: PathBuf,
    /// Invoke `on_review` with the PKGBUILD text before building.
    pub review_pkgbuild: bool,
    /// Hook invoked when `review_pkgbuild` is set; `None` skips review entirely.
    pub on_review: Option<ReviewHook>,
    /// Run the build inside the namespace sandbox when available.
    pub use_sandbox: bool,
    /// Skip `makepkg`'s own interactive prompts.
    pub auto_confirm: bool,
}

impl std::fmt::Debug for BuildOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildOptions")
            .field("cache_dir", &self.cache_dir)
            .field("review_pkgbuild", &self.review_pkgbuild)
            .field("has_review_hook", &self.on_review.is_some())
            .field("use_sandbox", &self.use_sandbox)
            .field("auto_confirm", &self.auto_confirm)
            .finish()
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("/tmp/poxy/aur"),
            review_pkgbuild: true,
            on_review: None,
            use_sandbox: true,
            auto_confirm: false,
        }
    }
}

/// Fetches, optionally reviews, optionally sandboxes, and builds an AUR
/// package via `makepkg -si`.
#[derive(Debug)]
pub struct Builder {
    executor: Executor,
}

impl Builder {
    /// Build a builder that runs commands through `executor`.
    #[must_use]
    pub const fn new(executor: Executor) -> Self {
        Self { executor }
    }

    /// Run the full fetch -> review -> (sandboxed) build -> install pipeline.
    ///
    /// # Errors
    /// Returns [`PoxyError::AurApiError`] if the package is unknown,
    /// [`PoxyError::OperationAborted`] if the review hook declines, or a
    /// sandbox/backend execution error if the build itself fails.
    pub async fn build_and_install(
        &self,
        client: &AurRpcClient,
        pkg_name: &str,
        opts: &BuildOptions,
    ) -> Result<()> {
        let details = self.fetch_metadata(client, pkg_name).await?;
        let repo_dir = self.clone_or_refresh(&details, opts).await?;

        if opts.review_pkgbuild {
            if let Some(hook) = &opts.on_review {
                let pkgbuild_path = repo_dir.join("PKGBUILD");
                let pkgbuild_text = tokio::fs::read_to_string(&pkgbuild_path).await?;
                if !hook(&pkgbuild_text) {
                    return Err(PoxyError::OperationAborted);
                }
            }
        }

        self.run_makepkg(&repo_dir, opts).await
    }

    async fn fetch_metadata(&self, client: &AurRpcClient, pkg_name: &str) -> Result<AurPackageDetails> {
        let mut details = client.aur().info(&[pkg_name]).await?;
        if details.is_empty() {
            return Err(PoxyError::AurApiError(format!("unknown AUR package: {pkg_name}")));
        }
        Ok(details.remove(0))
    }

    async fn clone_or_refresh(&self, details: &AurPackageDetails, opts: &BuildOptions) -> Result<PathBuf> {
        let repo_dir = opts.cache_dir.join(&details.name);
        let cancel = CancelToken::new();
        if repo_dir.join(".git").exists() {
            self.executor
                .run(&cancel, "git", &["-C", &repo_dir.to_string_lossy(), "pull", "--ff-only"])
                .await?;
        } else {
            tokio::fs::create_dir_all(&opts.cache_dir).await?;
            self.executor
                .run(
                    &cancel,
                    "git",
                    &["clone", &details.git_clone_url(), &repo_dir.to_string_lossy()],
                )
                .await?;
        }
        Ok(repo_dir)
    }

    async fn run_makepkg(&self, repo_dir: &Path, opts: &BuildOptions) -> Result<()> {
        let cancel = CancelToken::new();
        let mut args = vec!["-si"];
        if opts.auto_confirm {
            args.push("--noconfirm");
        }

        #[cfg(all(feature = "aur", feature = "sandbox-linux"))]
        if opts.use_sandbox && Sandbox::is_available() {
            let sandbox = Sandbox::new(self.executor);
            let profile = Profile::build(repo_dir);
            return sandbox.run(&cancel, &profile, "makepkg", &args).await;
        }

        self.executor.run_in_dir(&cancel, repo_dir, "makepkg", &args).await
    }
}
