//! Cross-source package-name mapping data types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// What: A canonical-name to per-source-name translation entry for one
/// logical piece of software.
///
/// Inputs: None (created via `MappingEntry::new` or [`seed_mappings`])
///
/// Output: `MappingEntry` describing one cross-source package identity
///
/// Details:
/// - `sources` maps a backend identifier (e.g. `"apt"`) to that backend's
///   own name for the package (e.g. `"code"`)
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Canonical identifier (e.g. `"vscode"`).
    pub canonical: String,
    /// Category tag (e.g. `"editor"`, `"browser"`).
    pub category: String,
    /// Per-backend package name, keyed by backend identifier.
    pub sources: HashMap<String, String>,
}

impl MappingEntry {
    /// Build a mapping entry from a canonical name, category, and `(backend, name)` pairs.
    #[must_use]
    pub fn new<const N: usize>(
        canonical: &str,
        category: &str,
        sources: [(&str, &str); N],
    ) -> Self {
        Self {
            canonical: canonical.to_string(),
            category: category.to_string(),
            sources: sources
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// Built-in seed list of well-known canonical packages.
#[must_use]
pub fn seed_mappings() -> Vec<MappingEntry> {
    vec![
        MappingEntry::new(
            "vscode",
            "editor",
            [
                ("aur", "visual-studio-code-bin"),
                ("apt", "code"),
                ("flatpak", "com.visualstudio.code"),
                ("brew", "visual-studio-code"),
                ("winget", "Microsoft.VisualStudioCode"),
            ],
        ),
        MappingEntry::new(
            "firefox",
            "browser",
            [
                ("pacman", "firefox"),
                ("apt", "firefox"),
                ("dnf", "firefox"),
                ("flatpak", "org.mozilla.firefox"),
                ("brew", "firefox"),
                ("winget", "Mozilla.Firefox"),
            ],
        ),
        MappingEntry::new(
            "chrome",
            "browser",
            [
                ("aur", "google-chrome"),
                ("flatpak", "com.google.Chrome"),
                ("winget", "Google.Chrome"),
            ],
        ),
        MappingEntry::new(
            "chromium",
            "browser",
            [
                ("pacman", "chromium"),
                ("apt", "chromium-browser"),
                ("dnf", "chromium"),
                ("flatpak", "org.chromium.Chromium"),
                ("brew", "chromium"),
            ],
        ),
        MappingEntry::new(
            "discord",
            "communication",
            [
                ("aur", "discord"),
                ("flatpak", "com.discordapp.Discord"),
                ("snap", "discord"),
                ("winget", "Discord.Discord"),
            ],
        ),
        MappingEntry::new(
            "slack",
            "communication",
            [
                ("aur", "slack-desktop"),
                ("flatpak", "com.slack.Slack"),
                ("snap", "slack"),
                ("winget", "SlackTechnologies.Slack"),
            ],
        ),
        MappingEntry::new(
            "telegram",
            "communication",
            [
                ("aur", "telegram-desktop"),
                ("apt", "telegram-desktop"),
                ("flatpak", "org.telegram.desktop"),
                ("snap", "telegram-desktop"),
            ],
        ),
        MappingEntry::new(
            "vlc",
            "media",
            [
                ("pacman", "vlc"),
                ("apt", "vlc"),
                ("dnf", "vlc"),
                ("flatpak", "org.videolan.VLC"),
                ("brew", "vlc"),
                ("winget", "VideoLAN.VLC"),
            ],
        ),
        MappingEntry::new(
            "spotify",
            "media",
            [
                ("aur", "spotify"),
                ("flatpak", "com.spotify.Client"),
                ("snap", "spotify"),
                ("winget", "Spotify.Spotify"),
            ],
        ),
        MappingEntry::new(
            "obs-studio",
            "media",
            [
                ("pacman", "obs-studio"),
                ("apt", "obs-studio"),
                ("dnf", "obs-studio"),
                ("flatpak", "com.obsproject.Studio"),
                ("brew", "obs"),
                ("winget", "OBSProject.OBSStudio"),
            ],
        ),
        MappingEntry::new(
            "docker",
            "development",
            [
                ("pacman", "docker"),
                ("apt", "docker.io"),
                ("dnf", "docker-ce"),
                ("brew", "docker"),
                ("winget", "Docker.DockerDesktop"),
            ],
        ),
        MappingEntry::new(
            "git",
            "development",
            [
                ("pacman", "git"),
                ("apt", "git"),
                ("dnf", "git"),
                ("brew", "git"),
                ("winget", "Git.Git"),
            ],
        ),
        MappingEntry::new(
            "neovim",
            "editor",
            [
                ("pacman", "neovim"),
                ("apt", "neovim"),
                ("dnf", "neovim"),
                ("flatpak", "io.neovim.nvim"),
                ("brew", "neovim"),
                ("winget", "Neovim.Neovim"),
            ],
        ),
        MappingEntry::new(
            "sublime-text",
            "editor",
            [
                ("aur", "sublime-text-4"),
                ("winget", "SublimeHQ.SublimeText.4"),
                ("brew", "sublime-text"),
            ],
        ),
        MappingEntry::new(
            "zoom",
            "communication",
            [
                ("aur", "zoom"),
                ("flatpak", "us.zoom.Zoom"),
                ("snap", "zoom-client"),
                ("winget", "Zoom.Zoom"),
            ],
        ),
        MappingEntry::new(
            "gimp",
            "media",
            [
                ("pacman", "gimp"),
                ("apt", "gimp"),
                ("dnf", "gimp"),
                ("flatpak", "org.gimp.GIMP"),
                ("brew", "gimp"),
                ("winget", "GIMP.GIMP"),
            ],
        ),
        MappingEntry::new(
            "blender",
            "media",
            [
                ("pacman", "blender"),
                ("apt", "blender"),
                ("dnf", "blender"),
                ("flatpak", "org.blender.Blender"),
                ("snap", "blender"),
                ("winget", "BlenderFoundation.Blender"),
            ],
        ),
        MappingEntry::new(
            "steam",
            "media",
            [
                ("pacman", "steam"),
                ("apt", "steam"),
                ("flatpak", "com.valvesoftware.Steam"),
                ("winget", "Valve.Steam"),
            ],
        ),
        MappingEntry::new(
            "thunderbird",
            "communication",
            [
                ("pacman", "thunderbird"),
                ("apt", "thunderbird"),
                ("dnf", "thunderbird"),
                ("flatpak", "org.mozilla.Thunderbird"),
                ("brew", "thunderbird"),
                ("winget", "Mozilla.Thunderbird"),
            ],
        ),
        MappingEntry::new(
            "libreoffice",
            "development",
            [
                ("pacman", "libreoffice-fresh"),
                ("apt", "libreoffice"),
                ("dnf", "libreoffice"),
                ("flatpak", "org.libreoffice.LibreOffice"),
                ("brew", "libreoffice"),
                ("winget", "TheDocumentFoundation.LibreOffice"),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_list_has_roughly_twenty_entries() {
        let seed = seed_mappings();
        assert!(seed.len() >= 18, "expected ~20 seed mappings, got {}", seed.len());
    }

    #[test]
    fn seed_entries_are_unique_by_canonical() {
        let seed = seed_mappings();
        let mut seen = std::collections::HashSet::new();
        for entry in &seed {
            assert!(seen.insert(entry.canonical.clone()));
        }
    }
}
