use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/senpro/config.toml` or `~/.config/senpro/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `SENPRO__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub playback: PlaybackSettings,
    pub library: LibrarySettings,
    pub scan: ScanSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
    /// Interval between time-update notifications while playing (milliseconds).
    pub time_update_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            quit_fade_out_ms: 500,
            time_update_ms: 250,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    pub theme: ThemeSettings,
    /// How long transient status messages stay visible (milliseconds).
    pub status_ms: u64,
    /// How long the mount-time scan hint stays visible (milliseconds).
    pub hint_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " SenPro Play Music ".to_string(),
            theme: ThemeSettings::default(),
            status_ms: 3000,
            hint_ms: 5000,
        }
    }
}

/// Colors used by the renderer. Values are anything `ratatui::style::Color`
/// parses: named colors (`"blue"`, `"lightblue"`), indexed (`"33"`) or `"#rrggbb"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    pub accent: String,
    pub highlight: String,
    pub dim: String,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            accent: "blue".to_string(),
            highlight: "lightblue".to_string(),
            dim: "gray".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
    /// Volume change per `+` / `-` press, in `[0, 1]`.
    pub volume_step: f32,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            scrub_seconds: 5,
            volume_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Volume at startup, in `[0, 1]`.
    pub initial_volume: f32,
    /// Whether repeat-one starts enabled.
    pub repeat_one: bool,
    /// Elapsed seconds after which "previous" restarts the current track.
    pub restart_threshold_secs: u64,
    /// Whether moving the volume above zero clears a manual mute.
    pub volume_change_unmutes: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            initial_volume: 0.7,
            repeat_one: false,
            restart_threshold_secs: 3,
            volume_change_unmutes: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Whether to follow symlinks during folder scans.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether folder scans recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
    /// Artist shown when a filename carries no `Artist - Title` separator.
    pub unknown_artist: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
            unknown_artist: "Desconocido".to_string(),
        }
    }
}

/// Which scan capability to try; the first available one in
/// `ScanSettings::probe_order` is used.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PickerKind {
    /// Enumerate the entries of the music folder.
    #[serde(alias = "directory", alias = "folder-entries")]
    Folder,
    /// Ask an external multi-file picker.
    #[serde(alias = "multi-file", alias = "file-picker")]
    Files,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    pub probe_order: Vec<PickerKind>,
    /// Folder enumerated by the `folder` capability. Defaults to the XDG music dir.
    pub music_dir: Option<PathBuf>,
    /// Program and arguments of the `files` capability. It must print one
    /// selected path per line and exit with status 1 on cancel.
    pub picker_command: Vec<String>,
    /// Extensions the `files` capability accepts (case-insensitive, dot optional).
    pub extensions: Vec<String>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        let extensions: Vec<String> = [".mp3", ".wav", ".ogg", ".m4a", ".aac", ".flac"]
            .iter()
            .map(|e| e.to_string())
            .collect();
        let filter = extensions
            .iter()
            .map(|e| format!("*{e}"))
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            probe_order: vec![PickerKind::Folder, PickerKind::Files],
            music_dir: None,
            picker_command: vec![
                "zenity".to_string(),
                "--file-selection".to_string(),
                "--multiple".to_string(),
                "--separator=\n".to_string(),
                format!("--file-filter=Audio | {filter}"),
            ],
            extensions,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Log file path. Defaults to `$XDG_STATE_HOME/senpro/senpro.log`.
    pub file: Option<PathBuf>,
    /// `tracing_subscriber::EnvFilter` directive, overridden by `SENPRO_LOG`.
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            file: None,
            filter: "senpro=info".to_string(),
        }
    }
}
