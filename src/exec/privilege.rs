//! Cross-platform "are we root" / "is there a sudo-equivalent" checks.
//!
//! POSIX: root means effective UID 0, the escalation binary is `sudo`.
//! Windows: root means membership in the built-in Administrators group,
//! the escalation binary is `sudo.exe` or `gsudo.exe`.

/// Whether the current process already has root/administrator privileges.
#[must_use]
pub fn is_root() -> bool {
    #[cfg(unix)]
    {
        nix::unistd::geteuid().is_root()
    }
    #[cfg(windows)]
    {
        windows_is_admin()
    }
    #[cfg(not(any(unix, windows)))]
    {
        false
    }
}

/// Whether an escalation helper (`sudo`/`gsudo`) is present on PATH.
#[must_use]
pub fn has_sudo() -> bool {
    sudo_candidates().into_iter().any(|name| which::which(name).is_ok())
}

/// The escalation binary name to prefix a command with.
///
/// Panics if called when [`has_sudo`] would return `false`; callers must
/// check availability first.
pub(super) fn sudo_binary_name() -> &'static str {
    sudo_candidates()
        .into_iter()
        .find(|name| which::which(name).is_ok())
        .unwrap_or("sudo")
}

const fn sudo_candidates() -> [&'static str; 2] {
    #[cfg(windows)]
    {
        ["gsudo", "sudo"]
    }
    #[cfg(not(windows))]
    {
        ["sudo", "sudo"]
    }
}

#[cfg(windows)]
fn windows_is_admin() -> bool {
    // `net session` only succeeds when run from an elevated (Administrators
    // group) process; no extra crate is needed to probe this.
    std::process::Command::new("net")
        .args(["session"])
        .output()
        .is_ok_and(|out| out.status.success())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sudo_candidates_are_non_empty() {
        assert!(!sudo_candidates().is_empty());
    }
}
