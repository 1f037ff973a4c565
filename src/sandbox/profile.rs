//! Declarative namespace/mount/capability bundles for [`super::Sandbox`].

use std::path::{Path, PathBuf};

/// What: A declarative bundle of namespace, mount, and capability settings
/// for running an untrusted build script inside a `bwrap`-style jail.
///
/// Inputs: None (constructed via `Profile::build`/`fetch`/`minimal`)
///
/// Output: `Profile` ready to render via `to_bwrap_args`
///
/// Details:
/// - `build`/`fetch`/`minimal` are the three canonical profiles, in
///   decreasing order of what the sandboxed process can reach
#[derive(Clone, Debug, Default)]
pub struct Profile {
    /// Unshare the user namespace (required for unprivileged remapping).
    pub unshare_user: bool,
    /// Unshare the PID namespace.
    pub unshare_pid: bool,
    /// Unshare the network namespace (no network access inside).
    pub unshare_net: bool,
    /// Unshare the IPC namespace.
    pub unshare_ipc: bool,
    /// Unshare the cgroup namespace.
    pub unshare_cgroup: bool,
    /// UID to appear as inside the namespace.
    pub uid: Option<u32>,
    /// GID to appear as inside the namespace.
    pub gid: Option<u32>,
    /// Read-only bind mounts, `(host_path, sandbox_path)`.
    pub ro_binds: Vec<(PathBuf, PathBuf)>,
    /// Read-write bind mounts, `(host_path, sandbox_path)`.
    pub rw_binds: Vec<(PathBuf, PathBuf)>,
    /// Device bind mounts, `(host_path, sandbox_path)`.
    pub dev_binds: Vec<(PathBuf, PathBuf)>,
    /// Mount a fresh `devtmpfs` at `/dev` inside the sandbox.
    pub dev_tmpfs: bool,
    /// Paths to mount an empty tmpfs at.
    pub tmpfs: Vec<PathBuf>,
    /// Symlinks to create, `(target, link_path)`.
    pub symlinks: Vec<(PathBuf, PathBuf)>,
    /// Environment variables to pass through from the host unchanged.
    pub env_passthrough: Vec<String>,
    /// Environment variables to set explicitly, `(name, value)`.
    pub env_set: Vec<(String, String)>,
    /// Clear the environment before applying `env_passthrough`/`env_set`.
    pub clear_env: bool,
    /// Linux capabilities to drop.
    pub drop_caps: Vec<String>,
    /// Kill the sandboxed process if the parent dies.
    pub die_with_parent: bool,
    /// Run the sandboxed command in a new session.
    pub new_session: bool,
    /// Working directory for the sandboxed command, inside the sandbox.
    pub chdir: Option<PathBuf>,
}

impl Profile {
    /// Network allowed, with the common build-tool mounts a `makepkg -si`
    /// invocation needs: `/usr`, `/etc`, `/bin` read-only, plus a
    /// caller-supplied build directory read-write.
    #[must_use]
    pub fn build(build_dir: &Path) -> Self {
        Self {
            unshare_user: true,
            unshare_pid: true,
            unshare_ipc: true,
            unshare_cgroup: true,
            ro_binds: vec![
                (PathBuf::from("/usr"), PathBuf::from("/usr")),
                (PathBuf::from("/etc"), PathBuf::from("/etc")),
            ],
            rw_binds: vec![(build_dir.to_path_buf(), build_dir.to_path_buf())],
            dev_tmpfs: true,
            tmpfs: vec![PathBuf::from("/tmp")],
            env_passthrough: vec!["PATH".into(), "HOME".into(), "USER".into()],
            drop_caps: vec!["ALL".into()],
            die_with_parent: true,
            new_session: true,
            chdir: Some(build_dir.to_path_buf()),
            ..Self::default()
        }
    }

    /// Tighter than [`Profile::build`]: source-download only, still networked
    /// but without a writable build directory beyond the cache path itself.
    #[must_use]
    pub fn fetch(cache_dir: &Path) -> Self {
        Self {
            unshare_user: true,
            unshare_pid: true,
            unshare_ipc: true,
            unshare_net: false,
            unshare_cgroup: true,
            ro_binds: vec![
                (PathBuf::from("/usr"), PathBuf::from("/usr")),
                (PathBuf::from("/etc/resolv.conf"), PathBuf::from("/etc/resolv.conf")),
            ],
            rw_binds: vec![(cache_dir.to_path_buf(), cache_dir.to_path_buf())],
            tmpfs: vec![PathBuf::from("/tmp")],
            env_passthrough: vec!["PATH".into(), "HOME".into()],
            drop_caps: vec!["ALL".into()],
            die_with_parent: true,
            new_session: true,
            ..Self::default()
        }
    }

    /// No network, no writable paths beyond a private `/tmp`.
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            unshare_user: true,
            unshare_pid: true,
            unshare_net: true,
            unshare_ipc: true,
            unshare_cgroup: true,
            ro_binds: vec![(PathBuf::from("/usr"), PathBuf::from("/usr"))],
            tmpfs: vec![PathBuf::from("/tmp")],
            drop_caps: vec!["ALL".into()],
            die_with_parent: true,
            new_session: true,
            ..Self::default()
        }
    }

    /// What: Render this profile as the flag sequence `bwrap` expects.
    ///
    /// Inputs: None
    ///
    /// Output:
    /// - `Vec<String>` ending in `--`, so the caller can append the program
    ///   and its arguments
    #[must_use]
    pub fn to_bwrap_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        let mut flag = |name: &str| args.push(name.to_string());

        if self.unshare_user {
            flag("--unshare-user");
        }
        if self.unshare_pid {
            flag("--unshare-pid");
        }
        if self.unshare_net {
            flag("--unshare-net");
        }
        if self.unshare_ipc {
            flag("--unshare-ipc");
        }
        if self.unshare_cgroup {
            flag("--unshare-cgroup");
        }
        if let Some(uid) = self.uid {
            args.push("--uid".into());
            args.push(uid.to_string());
        }
        if let Some(gid) = self.gid {
            args.push("--gid".into());
            args.push(gid.to_string());
        }
        for (host, sandbox) in &self.ro_binds {
            args.push("--ro-bind".into());
            args.push(host.display().to_string());
            args.push(sandbox.display().to_string());
        }
        for (host, sandbox) in &self.rw_binds {
            args.push("--bind".into());
            args.push(host.display().to_string());
            args.push(sandbox.display().to_string());
        }
        for (host, sandbox) in &self.dev_binds {
            args.push("--dev-bind".into());
            args.push(host.display().to_string());
            args.push(sandbox.display().to_string());
        }
        if self.dev_tmpfs {
            args.push("--dev".into());
            args.push("/dev".into());
        }
        for path in &self.tmpfs {
            args.push("--tmpfs".into());
            args.push(path.display().to_string());
        }
        for (target, link) in &self.symlinks {
            args.push("--symlink".into());
            args.push(target.display().to_string());
            args.push(link.display().to_string());
        }
        if self.clear_env {
            flag("--clearenv");
        }
        for name in &self.env_passthrough {
            args.push("--setenv-if-unset".into());
            args.push(name.clone());
            args.push(std::env::var(name).unwrap_or_default());
        }
        for (name, value) in &self.env_set {
            args.push("--setenv".into());
            args.push(name.clone());
            args.push(value.clone());
        }
        for cap in &self.drop_caps {
            args.push("--cap-drop".into());
            args.push(cap.clone());
        }
        if self.die_with_parent {
            flag("--die-with-parent");
        }
        if self.new_session {
            flag("--new-session");
        }
        if let Some(dir) = &self.chdir {
            args.push("--chdir".into());
            args.push(dir.display().to_string());
        }
        args.push("--".into());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_profile_includes_writable_build_dir() {
        let profile = Profile::build(Path::new("/tmp/poxy/build/yay"));
        assert!(
            profile
                .rw_binds
                .iter()
                .any(|(h, _)| h == Path::new("/tmp/poxy/build/yay"))
        );
        assert!(!profile.unshare_net);
    }

    #[test]
    fn minimal_profile_has_no_network() {
        assert!(Profile::minimal().unshare_net);
    }

    #[test]
    fn bwrap_args_end_with_separator() {
        let args = Profile::minimal().to_bwrap_args();
        assert_eq!(args.last().map(String::as_str), Some("--"));
    }
}
