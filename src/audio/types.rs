//! Audio-related small types: commands, notifications and the element seam.

use std::time::Duration;

use thiserror::Error;

/// Commands understood by the audio thread.
#[derive(Debug)]
pub enum AudioCmd {
    /// Replace the current source with the file behind this media URL (paused).
    Load(String),
    Play,
    Pause,
    /// Jump to an absolute position in the current source.
    Seek(Duration),
    /// Output volume in `[0, 1]`.
    SetVolume(f32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Notifications pushed by the audio thread back to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Playback position changed.
    TimeUpdate(Duration),
    /// The loaded source reported its length.
    LoadedMetadata(Duration),
    /// The source loaded from this media URL played to its end; the element
    /// is now paused.
    Ended(String),
    /// A `Play` request could not be honored.
    PlayFailed(String),
}

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no audio output device")]
    NoOutputDevice,

    #[error("media url {0} was revoked")]
    Revoked(String),

    #[error("nothing is loaded")]
    NothingLoaded,

    #[error("failed to open {path}: {source}")]
    Open {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: std::path::PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
}

/// The playback surface the controller drives.
///
/// Calls are fire-and-forget; outcomes come back as `MediaEvent`s.
pub trait MediaElement {
    fn load(&mut self, url: &str);
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, position: Duration);
    fn set_volume(&mut self, volume: f32);
    /// Stop for good, fading out first when `fade_out` is non-zero.
    fn shutdown(&mut self, _fade_out: Duration) {}
}
