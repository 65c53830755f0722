use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads the optional config file first, then lets
/// environment variables (prefix `SENPRO__`) override it, falling back to
/// struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("SENPRO")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.playback.initial_volume) {
            return Err("playback.initial_volume must be within [0, 1]".to_string());
        }
        if !(self.controls.volume_step > 0.0 && self.controls.volume_step <= 1.0) {
            return Err("controls.volume_step must be within (0, 1]".to_string());
        }
        if self.audio.time_update_ms == 0 {
            return Err("audio.time_update_ms must be >= 1".to_string());
        }
        if self.scan.probe_order.is_empty() {
            return Err("scan.probe_order must name at least one picker".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `SENPRO_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("SENPRO_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/senpro/config.toml`
/// or `~/.config/senpro/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("senpro").join("config.toml"))
}

/// Directory for runtime state (preferences, logs):
/// `$XDG_STATE_HOME/senpro` or `~/.local/state/senpro`.
pub fn default_state_dir() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", ".local/state").map(|d| d.join("senpro"))
}

/// The user's music folder: `$XDG_MUSIC_DIR` or `~/Music`.
pub fn default_music_dir() -> Option<PathBuf> {
    if let Some(p) = env::var_os("XDG_MUSIC_DIR") {
        return Some(PathBuf::from(p));
    }
    env::var_os("HOME").map(|home| PathBuf::from(home).join("Music"))
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(dir) = env::var_os(var) {
        Some(PathBuf::from(dir))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}
