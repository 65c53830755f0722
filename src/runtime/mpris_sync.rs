use std::time::Duration;

use crate::app::{App, Transport};
use crate::mpris::MprisHandle;

/// The part of `App` the MPRIS service mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MprisSnapshot {
    index: Option<usize>,
    transport: Transport,
    duration: Duration,
}

impl MprisSnapshot {
    pub fn of(app: &App) -> Self {
        Self {
            index: app.has_tracks().then_some(app.playback.current_index),
            transport: app.transport(),
            duration: app.playback.duration,
        }
    }
}

pub fn update_mpris(mpris: &MprisHandle, app: &App) {
    let index = app.has_tracks().then_some(app.playback.current_index);
    mpris.set_track_metadata(index, app.current_track());
    mpris.set_playback(app.transport(), &app.playback);
}

/// Push to MPRIS only when something it shows changed.
pub fn sync_if_changed(mpris: &MprisHandle, app: &App, last: &mut Option<MprisSnapshot>) {
    let now = MprisSnapshot::of(app);
    if *last != Some(now) {
        update_mpris(mpris, app);
        *last = Some(now);
    }
}
