use std::path::PathBuf;

use thiserror::Error;

/// Why a request to add music produced nothing.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// No scan capability in the probe order is usable on this host.
    #[error("no scan capability is available")]
    Unavailable,

    /// The user dismissed the picker.
    #[error("selection cancelled")]
    Cancelled,

    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The picker ran but did not behave as expected.
    #[error("picker failed: {0}")]
    Picker(String),
}
