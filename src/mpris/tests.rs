use super::*;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use crate::library::{MediaRegistry, SourceFile};

fn make_track(registry: &MediaRegistry) -> Track {
    let path = PathBuf::from("/tmp/music/test.mp3");
    Track {
        name: "Bohemian Rhapsody".to_string(),
        artist: "Queen".to_string(),
        url: registry.register(Path::new(&path)),
        source: SourceFile {
            path,
            media_type: "audio/mpeg",
        },
    }
}

fn iface(state: &Arc<Mutex<SharedState>>) -> PlayerIface {
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    PlayerIface {
        tx,
        state: state.clone(),
    }
}

#[test]
fn set_track_metadata_sets_and_clears_shared_state() {
    let registry = MediaRegistry::new();
    let state = Arc::new(Mutex::new(SharedState::default()));
    let handle = MprisHandle {
        state: state.clone(),
    };

    let track = make_track(&registry);
    handle.set_track_metadata(Some(7), Some(&track));

    {
        let s = state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Bohemian Rhapsody"));
        assert_eq!(s.artist.as_deref(), Some("Queen"));
        assert!(s.url.as_deref().unwrap().contains("/tmp/music/test.mp3"));
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/mpris/MediaPlayer2/track/7")
        );
    }

    handle.set_track_metadata(None, None);
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title, None);
        assert_eq!(s.artist, None);
        assert_eq!(s.url, None);
        assert!(s.track_id.is_none());
    }
}

#[test]
fn set_playback_reports_length_once_known() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let handle = MprisHandle {
        state: state.clone(),
    };

    let mut playback = PlaybackState::default();
    handle.set_playback(Transport::Playing, &playback);
    assert_eq!(state.lock().unwrap().length_micros, None);

    playback.duration = Duration::from_micros(1_234_567);
    handle.set_playback(Transport::Playing, &playback);
    let s = state.lock().unwrap();
    assert_eq!(s.length_micros, Some(1_234_567));
    assert_eq!(s.transport, Transport::Playing);
}

#[test]
fn playback_status_distinguishes_paused_from_empty() {
    let registry = MediaRegistry::new();
    let state = Arc::new(Mutex::new(SharedState::default()));
    let player = iface(&state);
    let handle = MprisHandle {
        state: state.clone(),
    };

    assert_eq!(player.playback_status(), "Stopped");

    let track = make_track(&registry);
    handle.set_track_metadata(Some(0), Some(&track));
    assert_eq!(player.playback_status(), "Paused");

    handle.set_playback(Transport::Playing, &PlaybackState::default());
    assert_eq!(player.playback_status(), "Playing");
}

#[test]
fn stop_is_forwarded_as_pause() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let player = PlayerIface { tx, state };
    player.stop();
    player.play_pause();
    assert_eq!(rx.try_recv().unwrap(), ControlCmd::Pause);
    assert_eq!(rx.try_recv().unwrap(), ControlCmd::PlayPause);
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let registry = MediaRegistry::new();
    let state = Arc::new(Mutex::new(SharedState::default()));
    let player = iface(&state);
    let handle = MprisHandle {
        state: state.clone(),
    };

    assert!(player.metadata().is_empty());

    let track = make_track(&registry);
    handle.set_track_metadata(Some(1), Some(&track));
    let playback = PlaybackState {
        duration: Duration::from_secs(42),
        ..PlaybackState::default()
    };
    handle.set_playback(Transport::Stopped, &playback);

    let map = player.metadata();
    for k in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "xesam:url",
        "mpris:length",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}
