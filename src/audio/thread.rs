use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error, warn};

use crate::config::AudioSettings;
use crate::library::MediaRegistry;

use super::sink::create_sink_at;
use super::types::{AudioCmd, MediaEvent, PlaybackError};

/// Elapsed-time bookkeeping: a running span plus whatever was accumulated
/// before the last pause.
#[derive(Debug, Default, Clone, Copy)]
pub(super) struct Clock {
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Clock {
    pub(super) fn start(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub(super) fn stop(&mut self, now: Instant) {
        if let Some(st) = self.started_at.take() {
            self.accumulated += now.saturating_duration_since(st);
        }
    }

    /// Jump to `position`, keeping the running/stopped state.
    pub(super) fn reset_to(&mut self, position: Duration, now: Instant) {
        self.accumulated = position;
        if self.started_at.is_some() {
            self.started_at = Some(now);
        }
    }

    pub(super) fn elapsed(&self, now: Instant) -> Duration {
        self.accumulated
            + self
                .started_at
                .map_or(Duration::ZERO, |st| now.saturating_duration_since(st))
    }
}

/// Volume for step `step` of `steps` when fading from `from` to silence.
pub(super) fn fade_level(from: f32, step: u64, steps: u64) -> f32 {
    let t = step.min(steps) as f32 / steps.max(1) as f32;
    from * (1.0 - t)
}

/// The rodio-backed element living on the audio thread.
struct Element {
    stream: Option<OutputStream>,
    registry: MediaRegistry,
    events: Sender<MediaEvent>,

    url: Option<String>,
    path: Option<PathBuf>,
    load_error: Option<PlaybackError>,
    sink: Option<Sink>,
    paused: bool,
    ended: bool,
    clock: Clock,
    volume: f32,
}

impl Element {
    fn emit(&self, event: MediaEvent) {
        // The controller is gone only during shutdown.
        let _ = self.events.send(event);
    }

    fn drop_sink(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }

    fn load(&mut self, url: &str) {
        self.drop_sink();
        self.paused = true;
        self.ended = false;
        self.clock = Clock::default();
        self.load_error = None;
        self.url = Some(url.to_string());
        self.path = self.registry.resolve(url);

        let prepared = match (&self.stream, &self.path) {
            (None, _) => Err(PlaybackError::NoOutputDevice),
            (_, None) => Err(PlaybackError::Revoked(url.to_string())),
            (Some(stream), Some(path)) => create_sink_at(stream, path, Duration::ZERO, self.volume),
        };

        self.emit(MediaEvent::TimeUpdate(Duration::ZERO));
        match prepared {
            Ok(p) => {
                debug!(url, duration = ?p.duration, "loaded");
                self.sink = Some(p.sink);
                self.emit(MediaEvent::LoadedMetadata(p.duration.unwrap_or_default()));
            }
            Err(e) => {
                warn!(url, error = %e, "load failed");
                self.load_error = Some(e);
                self.emit(MediaEvent::LoadedMetadata(Duration::ZERO));
            }
        }
    }

    /// Rebuild the sink at `position`, keeping the paused/playing state.
    fn rebuild_at(&mut self, position: Duration) -> Result<(), PlaybackError> {
        let (Some(stream), Some(path)) = (&self.stream, &self.path) else {
            return Err(PlaybackError::NothingLoaded);
        };
        let prepared = create_sink_at(stream, path, position, self.volume)?;
        if let Some(old) = self.sink.replace(prepared.sink) {
            old.stop();
        }
        if !self.paused {
            if let Some(s) = &self.sink {
                s.play();
            }
        }
        self.ended = false;
        self.clock.reset_to(position, Instant::now());
        Ok(())
    }

    fn play(&mut self) {
        if let Some(e) = &self.load_error {
            self.emit(MediaEvent::PlayFailed(e.to_string()));
            return;
        }
        if self.sink.is_none() {
            self.emit(MediaEvent::PlayFailed(PlaybackError::NothingLoaded.to_string()));
            return;
        }
        if !self.paused {
            return;
        }
        // A finished source starts over, like a media element replayed after `ended`.
        if self.ended {
            if let Err(e) = self.rebuild_at(Duration::ZERO) {
                self.emit(MediaEvent::PlayFailed(e.to_string()));
                return;
            }
            self.emit(MediaEvent::TimeUpdate(Duration::ZERO));
        }
        if let Some(s) = &self.sink {
            s.play();
        }
        self.paused = false;
        self.clock.start(Instant::now());
    }

    fn pause(&mut self) {
        if self.paused {
            return;
        }
        if let Some(s) = &self.sink {
            s.pause();
        }
        self.paused = true;
        self.clock.stop(Instant::now());
    }

    fn seek(&mut self, position: Duration) {
        if self.sink.is_none() {
            return;
        }
        // Scrubbing: rebuild the current sink and skip into the file.
        match self.rebuild_at(position) {
            Ok(()) => self.emit(MediaEvent::TimeUpdate(position)),
            Err(e) => warn!(error = %e, "seek failed"),
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(s) = &self.sink {
            s.set_volume(self.volume);
        }
    }

    /// Periodic work: publish the position and detect the end of the source.
    fn tick(&mut self) {
        if self.paused {
            return;
        }
        let Some(sink) = &self.sink else {
            return;
        };
        let now = Instant::now();
        if sink.empty() && !self.ended {
            self.ended = true;
            self.paused = true;
            self.clock.stop(now);
            self.emit(MediaEvent::TimeUpdate(self.clock.elapsed(now)));
            if let Some(url) = self.url.clone() {
                self.emit(MediaEvent::Ended(url));
            }
        } else {
            self.emit(MediaEvent::TimeUpdate(self.clock.elapsed(now)));
        }
    }

    fn fade_out(&mut self, fade_out_ms: u64) {
        let Some(sink) = &self.sink else {
            return;
        };
        if !self.paused && fade_out_ms > 0 {
            let steps: u64 = 20;
            let step_ms = (fade_out_ms / steps).max(1);
            for step in 1..=steps {
                sink.set_volume(fade_level(self.volume, step, steps));
                thread::sleep(Duration::from_millis(step_ms));
            }
        }
        sink.stop();
    }
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<MediaEvent>,
    registry: MediaRegistry,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped, which
                // would scribble over the TUI.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                error!(error = %e, "no audio output device; playback will fail");
                None
            }
        };

        let mut element = Element {
            stream,
            registry,
            events,
            url: None,
            path: None,
            load_error: None,
            sink: None,
            paused: true,
            ended: false,
            clock: Clock::default(),
            volume: 1.0,
        };

        let tick_every = Duration::from_millis(audio_settings.time_update_ms.max(1));
        let mut last_tick = Instant::now();

        loop {
            let wait = tick_every.saturating_sub(last_tick.elapsed());
            match rx.recv_timeout(wait) {
                Ok(AudioCmd::Load(url)) => element.load(&url),
                Ok(AudioCmd::Play) => element.play(),
                Ok(AudioCmd::Pause) => element.pause(),
                Ok(AudioCmd::Seek(position)) => element.seek(position),
                Ok(AudioCmd::SetVolume(v)) => element.set_volume(v),
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    element.fade_out(fade_out_ms);
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if last_tick.elapsed() >= tick_every {
                element.tick();
                last_tick = Instant::now();
            }
        }
        debug!("audio thread stopped");
    })
}
