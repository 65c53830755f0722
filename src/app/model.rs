//! The playback controller: `App` owns the playlist and playback state and
//! drives the media element from user intents and media notifications.

use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::audio::{MediaElement, MediaEvent};
use crate::config::Settings;
use crate::library::{AcquireError, Acquired, Track};
use crate::prefs::{AUTO_SCAN_PERMISSION, Preferences};

use super::playlist::Playlist;
use super::status::StatusLine;

/// Coarse transport state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Transport {
    /// No current track, or paused.
    #[default]
    Stopped,
    Playing,
}

/// Everything the controller knows about playback.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub current_index: usize,
    pub is_playing: bool,
    /// Stored volume in `[0, 1]`; the element hears 0 while muted.
    pub volume: f32,
    pub is_muted: bool,
    pub is_repeat_one: bool,
    /// Last position reported by the element (or set by a seek).
    pub current_time: Duration,
    /// Length reported by the element for the loaded track.
    pub duration: Duration,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_index: 0,
            is_playing: false,
            volume: 0.7,
            is_muted: false,
            is_repeat_one: false,
            current_time: Duration::ZERO,
            duration: Duration::ZERO,
        }
    }
}

/// Which line the keyboard is typing into.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// The manual file chooser prompt is open.
    AddFiles,
}

/// Behavior knobs taken from `Settings`.
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub initial_volume: f32,
    pub repeat_one: bool,
    pub restart_threshold: Duration,
    pub volume_change_unmutes: bool,
    pub status_ttl: Duration,
    pub cancel_ttl: Duration,
    pub hint_ttl: Duration,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl AppOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        let status_ttl = Duration::from_millis(settings.ui.status_ms);
        Self {
            initial_volume: settings.playback.initial_volume.clamp(0.0, 1.0),
            repeat_one: settings.playback.repeat_one,
            restart_threshold: Duration::from_secs(settings.playback.restart_threshold_secs),
            volume_change_unmutes: settings.playback.volume_change_unmutes,
            status_ttl,
            // Cancellations are acknowledged a little faster than other notices.
            cancel_ttl: status_ttl * 2 / 3,
            hint_ttl: Duration::from_millis(settings.ui.hint_ms),
        }
    }
}

/// The main application model.
pub struct App {
    pub playlist: Playlist,
    pub playback: PlaybackState,
    /// Highlighted row in the playlist view (independent of the current track).
    pub cursor: usize,
    pub status: StatusLine,
    pub scanning: bool,
    pub input_mode: InputMode,
    pub input: String,

    media: Box<dyn MediaElement>,
    prefs: Box<dyn Preferences>,
    loaded_url: Option<String>,
    /// A new URL was loaded and its length has not been reported yet.
    metadata_pending: bool,
    options: AppOptions,
}

impl App {
    /// Create the controller with an empty playlist.
    pub fn new(
        media: Box<dyn MediaElement>,
        prefs: Box<dyn Preferences>,
        options: AppOptions,
    ) -> Self {
        let playback = PlaybackState {
            volume: options.initial_volume,
            is_repeat_one: options.repeat_one,
            ..PlaybackState::default()
        };
        Self {
            playlist: Playlist::new(),
            playback,
            cursor: 0,
            status: StatusLine::default(),
            scanning: false,
            input_mode: InputMode::Normal,
            input: String::new(),
            media,
            prefs,
            loaded_url: None,
            metadata_pending: false,
            options,
        }
    }

    /// Startup work: push the initial volume and, on mobile hosts that
    /// scanned before, remind the user that scanning is available.
    pub fn mount(&mut self, is_mobile: bool, now: Instant) {
        self.sync_volume();
        if is_mobile && self.prefs.get(AUTO_SCAN_PERMISSION) == Some(true) {
            self.status.show(
                "Puedes escanear tu música con la tecla «s» (Escanear música)",
                self.options.hint_ttl,
                now,
            );
        }
    }

    /// Tear down: stop the element and release every media URL.
    pub fn shutdown(&mut self, fade_out: Duration) {
        self.media.shutdown(fade_out);
        self.playback.is_playing = false;
        self.loaded_url = None;
        self.metadata_pending = false;
        self.playlist.clear();
    }

    pub fn has_tracks(&self) -> bool {
        !self.playlist.is_empty()
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.playlist.get(self.playback.current_index)
    }

    pub fn transport(&self) -> Transport {
        if self.playback.is_playing && self.has_tracks() {
            Transport::Playing
        } else {
            Transport::Stopped
        }
    }

    /// Volume the element should actually output.
    pub fn effective_volume(&self) -> f32 {
        if self.playback.is_muted {
            0.0
        } else {
            self.playback.volume
        }
    }

    /// Make the element match the state: load the current track's URL if it
    /// changed, then play or pause.
    fn sync_media(&mut self) {
        let url = self.current_track().map(|t| t.url.as_str().to_string());
        if url != self.loaded_url {
            if let Some(u) = &url {
                self.media.load(u);
            }
            self.metadata_pending = url.is_some();
            self.loaded_url = url;
        }
        if self.loaded_url.is_none() {
            return;
        }
        if self.playback.is_playing {
            self.media.play();
        } else {
            self.media.pause();
        }
    }

    fn sync_volume(&mut self) {
        let volume = self.effective_volume();
        self.media.set_volume(volume);
    }

    // Playlist

    /// Append acquired tracks. The first batch into an empty playlist makes
    /// its first track current. Returns how many tracks were added.
    pub fn add_tracks(&mut self, acquired: Acquired) -> usize {
        let was_empty = self.playlist.is_empty();
        let added = self.playlist.append(acquired.tracks);
        if was_empty && added > 0 {
            self.playback.current_index = 0;
            self.cursor = 0;
        }
        if added > 0 {
            self.sync_media();
        }
        added
    }

    // Transport

    pub fn play(&mut self) {
        if !self.has_tracks() {
            return;
        }
        self.playback.is_playing = true;
        self.sync_media();
    }

    pub fn pause(&mut self) {
        self.playback.is_playing = false;
        self.sync_media();
    }

    pub fn toggle_play(&mut self) {
        if self.playback.is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Move to the next track, wrapping to the first. Keeps playing/paused as is.
    pub fn next(&mut self) {
        if let Some(next) = self.playlist.next_index(self.playback.current_index) {
            self.playback.current_index = next;
            self.sync_media();
        }
    }

    /// Restart the current track when past the restart threshold, otherwise
    /// move to the previous track (wrapping to the last).
    pub fn previous(&mut self) {
        if !self.has_tracks() {
            return;
        }
        if self.playback.current_time > self.options.restart_threshold {
            self.media.seek(Duration::ZERO);
            self.playback.current_time = Duration::ZERO;
        } else if let Some(prev) = self.playlist.prev_index(self.playback.current_index) {
            self.playback.current_index = prev;
            self.sync_media();
        }
    }

    /// Make track `index` current and play it.
    pub fn select_track(&mut self, index: usize) {
        if index >= self.playlist.len() {
            warn!(index, len = self.playlist.len(), "ignoring selection out of range");
            return;
        }
        self.playback.current_index = index;
        self.cursor = index;
        self.playback.is_playing = true;
        self.sync_media();
    }

    /// Jump to `position`; the displayed time follows immediately.
    pub fn seek(&mut self, position: Duration) {
        if self.loaded_url.is_none() {
            return;
        }
        // `duration` still belongs to the previous track until metadata arrives.
        let position = if self.metadata_pending || self.playback.duration.is_zero() {
            position
        } else {
            position.min(self.playback.duration)
        };
        self.media.seek(position);
        self.playback.current_time = position;
    }

    /// Seek relative to the current position.
    pub fn seek_by(&mut self, delta_secs: i64) {
        let step = Duration::from_secs(delta_secs.unsigned_abs());
        let target = if delta_secs < 0 {
            self.playback.current_time.saturating_sub(step)
        } else {
            self.playback.current_time + step
        };
        self.seek(target);
    }

    /// Set the stored volume (clamped to `[0, 1]`). Zero also mutes.
    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_nan() {
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        self.playback.volume = volume;
        if volume == 0.0 {
            self.playback.is_muted = true;
        } else if self.options.volume_change_unmutes {
            self.playback.is_muted = false;
        }
        self.sync_volume();
    }

    pub fn step_volume(&mut self, delta: f32) {
        self.set_volume(self.playback.volume + delta);
    }

    pub fn toggle_mute(&mut self) {
        self.playback.is_muted = !self.playback.is_muted;
        self.sync_volume();
    }

    pub fn toggle_repeat(&mut self) {
        self.playback.is_repeat_one = !self.playback.is_repeat_one;
    }

    // Media notifications

    pub fn on_media_event(&mut self, event: MediaEvent, now: Instant) {
        match event {
            MediaEvent::TimeUpdate(t) => self.on_time_update(t),
            MediaEvent::LoadedMetadata(d) => self.on_metadata_loaded(d),
            MediaEvent::Ended(url) => {
                if self.loaded_url.as_deref() == Some(url.as_str()) {
                    self.on_track_ended();
                } else {
                    debug!(%url, "ignoring end of a track that is no longer loaded");
                }
            }
            MediaEvent::PlayFailed(reason) => self.on_play_failed(&reason, now),
        }
    }

    pub fn on_time_update(&mut self, position: Duration) {
        self.playback.current_time = position;
    }

    pub fn on_metadata_loaded(&mut self, duration: Duration) {
        self.playback.duration = duration;
        self.metadata_pending = false;
    }

    /// Repeat-one replays the same track; otherwise advance and keep playing.
    pub fn on_track_ended(&mut self) {
        if !self.has_tracks() {
            return;
        }
        if self.playback.is_repeat_one {
            self.media.seek(Duration::ZERO);
            self.playback.current_time = Duration::ZERO;
            self.playback.is_playing = true;
            self.sync_media();
        } else {
            self.playback.is_playing = true;
            self.next();
        }
    }

    pub fn on_play_failed(&mut self, reason: &str, now: Instant) {
        error!(reason, "playback failed to start");
        self.playback.is_playing = false;
        self.status
            .show("No se pudo reproducir la canción.", self.options.status_ttl, now);
    }

    // Acquisition

    /// Result of a manual selection.
    pub fn add_manual(&mut self, acquired: Acquired, now: Instant) {
        let skipped = acquired.skipped;
        let added = self.add_tracks(acquired);
        info!(added, skipped, "manual selection");
        if added == 0 && skipped == 0 {
            self.status
                .show("No se encontraron archivos de audio.", self.options.status_ttl, now);
        } else if skipped > 0 {
            self.status.show(
                format!("Se añadieron {added} canciones; {skipped} no se pudieron abrir."),
                self.options.status_ttl,
                now,
            );
        }
    }

    /// Mark a scan as started. Returns false if one is already running.
    pub fn begin_scan(&mut self) -> bool {
        if self.scanning {
            return false;
        }
        self.scanning = true;
        self.status.show_sticky("Escaneando música...");
        true
    }

    /// Apply the outcome of a device scan.
    pub fn finish_scan(&mut self, outcome: Result<Acquired, AcquireError>, now: Instant) {
        self.scanning = false;
        match outcome {
            Ok(acquired) => {
                let skipped = acquired.skipped;
                let added = self.add_tracks(acquired);
                if let Err(e) = self.prefs.set(AUTO_SCAN_PERMISSION, true) {
                    warn!(error = %e, "could not persist scan preference");
                }
                let message = if skipped > 0 {
                    format!("¡Listo! Se añadieron {added} canciones ({skipped} omitidas).")
                } else {
                    format!("¡Listo! Se añadieron {added} canciones.")
                };
                self.status.show(message, self.options.status_ttl, now);
            }
            Err(AcquireError::Cancelled) => {
                info!("scan cancelled");
                self.status
                    .show("Selección de archivos cancelada.", self.options.cancel_ttl, now);
            }
            Err(AcquireError::Unavailable) => {
                info!("no scan capability, falling back to manual selection");
                self.status.show(
                    "Tu sistema no permite el escaneo automático. Elige los archivos manualmente.",
                    self.options.status_ttl,
                    now,
                );
                self.open_chooser();
            }
            Err(e) => {
                error!(error = %e, "scan failed");
                self.status.show(
                    "Hubo un problema. Intenta seleccionar los archivos manualmente.",
                    self.options.status_ttl,
                    now,
                );
            }
        }
    }

    // Manual chooser prompt

    pub fn open_chooser(&mut self) {
        self.input_mode = InputMode::AddFiles;
        self.input.clear();
    }

    pub fn close_chooser(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input.clear();
    }

    pub fn push_input_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_input_char(&mut self) {
        self.input.pop();
    }

    /// Close the prompt and hand back what was typed, if anything.
    pub fn submit_chooser(&mut self) -> Option<String> {
        let typed = self.input.trim().to_string();
        self.close_chooser();
        (!typed.is_empty()).then_some(typed)
    }

    // Cursor

    pub fn cursor_down(&mut self) {
        if let Some(next) = self.playlist.next_index(self.cursor) {
            self.cursor = next;
        }
    }

    pub fn cursor_up(&mut self) {
        if let Some(prev) = self.playlist.prev_index(self.cursor) {
            self.cursor = prev;
        }
    }

    /// Per-turn housekeeping.
    pub fn tick(&mut self, now: Instant) {
        self.status.expire(now);
    }
}
