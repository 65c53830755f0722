use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::warn;

use crate::config::AudioSettings;
use crate::library::MediaRegistry;

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, MediaElement, MediaEvent};

/// Handle to the audio thread; the production `MediaElement`.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    join: Option<JoinHandle<()>>,
}

impl AudioPlayer {
    /// Start the audio thread. Notifications arrive on the returned receiver.
    pub fn new(registry: MediaRegistry, audio_settings: AudioSettings) -> (Self, Receiver<MediaEvent>) {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (event_tx, event_rx) = mpsc::channel::<MediaEvent>();

        let join = spawn_audio_thread(rx, event_tx, registry, audio_settings);

        (
            Self {
                tx,
                join: Some(join),
            },
            event_rx,
        )
    }

    fn send(&self, cmd: AudioCmd) {
        if let Err(e) = self.tx.send(cmd) {
            warn!(cmd = ?e.0, "audio thread is gone");
        }
    }
}

impl MediaElement for AudioPlayer {
    fn load(&mut self, url: &str) {
        self.send(AudioCmd::Load(url.to_string()));
    }

    fn play(&mut self) {
        self.send(AudioCmd::Play);
    }

    fn pause(&mut self) {
        self.send(AudioCmd::Pause);
    }

    fn seek(&mut self, position: Duration) {
        self.send(AudioCmd::Seek(position));
    }

    fn set_volume(&mut self, volume: f32) {
        self.send(AudioCmd::SetVolume(volume));
    }

    fn shutdown(&mut self, fade_out: Duration) {
        self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}
