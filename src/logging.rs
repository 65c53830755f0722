use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogSettings, default_state_dir};

/// Env var holding an `EnvFilter` directive that overrides `log.filter`.
pub const LOG_ENV: &str = "SENPRO_LOG";

/// Where log lines go when `log.file` is unset.
pub fn log_path(settings: &LogSettings) -> Option<PathBuf> {
    settings
        .file
        .clone()
        .or_else(|| default_state_dir().map(|d| d.join("senpro.log")))
}

fn filter(settings: &LogSettings) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new("senpro=info"))
}

/// Install the global subscriber, appending to the log file.
///
/// The terminal belongs to the TUI, so nothing is ever written to stdout or
/// stderr. Returns the file in use.
pub fn init(settings: &LogSettings) -> Result<PathBuf> {
    let path = log_path(settings).context("no state directory for the log file")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(filter(settings))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_file_wins() {
        let settings = LogSettings {
            file: Some(PathBuf::from("/tmp/senpro-test.log")),
            ..LogSettings::default()
        };
        assert_eq!(log_path(&settings), Some(PathBuf::from("/tmp/senpro-test.log")));
    }
}
