use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/unison/config.toml` or `~/.config/unison/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `UNISON__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
///
/// Every listener must share the `sync` and `library` sections, otherwise
/// they derive different timelines.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub sync: SyncSettings,
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SyncSettings {
    /// The shared start of the timeline, in seconds since the Unix epoch.
    pub anchor_unix: i64,
    /// Directory the playlist is built from. The first CLI argument overrides it.
    pub location: String,
    /// Loop the timeline forever instead of restarting at track 0 once the
    /// elapsed time runs past the end of the playlist.
    pub wrap_timeline: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            anchor_unix: 1_737_572_155,
            location: "media".to_string(),
            wrap_timeline: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,

    /// Which fields build the human-readable track name.
    ///
    /// Example: ["artist", "title"] -> "Artist - Title"
    pub name_fields: Vec<TrackNameField>,
    /// Separator used to join `name_fields`.
    pub name_separator: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: false,
            recursive: false,
            max_depth: None,
            name_fields: vec![TrackNameField::Filename],
            name_separator: " - ".to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackNameField {
    Title,
    Artist,
    Album,
    Filename,
    Path,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// What to do when a track cannot be loaded or played.
    pub fault_policy: FaultPolicySetting,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FaultPolicySetting {
    /// Move on to the next track, giving up after a full round of failures.
    #[default]
    #[serde(alias = "skip-to-next", alias = "next")]
    Skip,
    /// Stop playback and show the "no content" screen.
    #[serde(alias = "stop")]
    Halt,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            quit_fade_out_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Upper bound on how long the event loop blocks waiting for input (milliseconds).
    pub tick_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ everyone hears the same song ~ ".to_string(),
            tick_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is not set.
    pub level: String,
    /// Log file. Falls back to the XDG state directory when unset.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
