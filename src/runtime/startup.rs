use std::env;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::prefs::{FilePreferences, MemoryPreferences, Preferences};

/// Explicit host identification, checked before anything else.
pub const HOST_AGENT_ENV: &str = "SENPRO_HOST_AGENT";

static MOBILE_AGENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Android|webOS|iPhone|iPad|iPod|BlackBerry|IEMobile|Opera Mini")
        .expect("mobile agent pattern is valid")
});

/// A string describing the host, matched against the mobile pattern.
///
/// `SENPRO_HOST_AGENT` wins; Termux and other Android userlands are
/// recognised by their environment; otherwise the compile-time OS name.
pub fn host_agent() -> String {
    if let Ok(agent) = env::var(HOST_AGENT_ENV) {
        return agent;
    }
    if env::var_os("TERMUX_VERSION").is_some() || env::var_os("ANDROID_ROOT").is_some() {
        return "Android".to_string();
    }
    env::consts::OS.to_string()
}

pub fn is_mobile(agent: &str) -> bool {
    MOBILE_AGENT.is_match(agent)
}

/// File-backed preferences under `state_dir`, or an in-memory store when
/// that is not possible.
pub fn open_preferences(state_dir: Option<&Path>) -> Box<dyn Preferences> {
    let Some(dir) = state_dir else {
        warn!("no state directory, preferences will not persist");
        return Box::new(MemoryPreferences::default());
    };
    match FilePreferences::open(dir.join("prefs.toml")) {
        Ok(prefs) => {
            debug!(path = %prefs.path().display(), "preferences loaded");
            Box::new(prefs)
        }
        Err(e) => {
            warn!(error = %e, "preferences unavailable, using in-memory store");
            Box::new(MemoryPreferences::default())
        }
    }
}

/// Replace a leading `~` with `home`.
pub fn expand_tilde(raw: &str, home: Option<&Path>) -> PathBuf {
    match (raw.strip_prefix('~'), home) {
        (Some(""), Some(home)) => home.to_path_buf(),
        (Some(rest), Some(home)) if rest.starts_with('/') => {
            home.join(rest.trim_start_matches('/'))
        }
        _ => PathBuf::from(raw),
    }
}

/// Paths typed into the add-files prompt.
///
/// The whole line is taken as one path when it names something that exists
/// (so names with spaces work); otherwise it is split on whitespace.
pub fn parse_chooser_input(input: &str, home: Option<&Path>) -> Vec<PathBuf> {
    let input = input.trim();
    if input.is_empty() {
        return Vec::new();
    }
    let whole = expand_tilde(input, home);
    if whole.exists() {
        return vec![whole];
    }
    input
        .split_whitespace()
        .map(|part| expand_tilde(part, home))
        .collect()
}
