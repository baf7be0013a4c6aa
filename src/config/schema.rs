use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/tapedeck/config.toml` or `~/.config/tapedeck/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `TAPEDECK__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub library: LibrarySettings,
    pub cover: CoverSettings,
    pub session: SessionSettings,
    pub logging: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// How often the audio thread reports the playback position (milliseconds).
    pub tick_ms: u64,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            tick_ms: 250,
            quit_fade_out_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Separator between elapsed and total time, e.g. `01:02 | 03:04`.
    pub time_separator: String,
    /// Whether the now-playing panel renders cover art.
    pub show_cover: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ one folder, one playlist ~ ".to_string(),
            time_separator: " | ".to_string(),
            show_cover: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
    /// Volume change per `+` / `-` press, in percent points.
    pub volume_step: u8,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            scrub_seconds: 5,
            volume_step: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
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
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: false,
            recursive: false,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CoverSettings {
    /// Embedded pictures larger than this are ignored.
    pub max_bytes: usize,
    /// Thumbnail size in terminal cells.
    pub thumbnail_width: u32,
    pub thumbnail_height: u32,
}

impl Default for CoverSettings {
    fn default() -> Self {
        Self {
            max_bytes: 5 * 1024 * 1024,
            thumbnail_width: 24,
            thumbnail_height: 12,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Where the session (directory, track index, volume) is persisted.
    /// Defaults to `$XDG_STATE_HOME/tapedeck/session.toml`.
    pub path: Option<PathBuf>,
    /// Write the session after every change instead of only on exit.
    pub save_on_change: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing` filter directive; `RUST_LOG` wins when set.
    pub level: String,
    /// Directory for `tapedeck.log`. Defaults to `logs/` in the state directory.
    pub directory: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}
