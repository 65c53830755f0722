use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tempfile::tempdir;

use super::event_loop::{EventLoopState, handle_key_event};
use super::startup::{expand_tilde, is_mobile, open_preferences, parse_chooser_input};
use crate::app::{App, AppOptions, InputMode};
use crate::audio::MediaElement;
use crate::config::Settings;
use crate::library::MediaRegistry;
use crate::prefs::{AUTO_SCAN_PERMISSION, MemoryPreferences, Preferences};

struct Silent;

impl MediaElement for Silent {
    fn load(&mut self, _url: &str) {}
    fn play(&mut self) {}
    fn pause(&mut self) {}
    fn seek(&mut self, _position: Duration) {}
    fn set_volume(&mut self, _volume: f32) {}
}

fn app() -> App {
    App::new(
        Box::new(Silent),
        Box::new(MemoryPreferences::default()),
        AppOptions::default(),
    )
}

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn type_line(
    line: &str,
    settings: &Settings,
    registry: &MediaRegistry,
    app: &mut App,
    state: &mut EventLoopState,
) {
    for c in line.chars() {
        assert!(!handle_key_event(press(KeyCode::Char(c)), settings, registry, app, state));
    }
}

#[test]
fn mobile_agents_are_recognised() {
    for agent in [
        "Mozilla/5.0 (Linux; Android 14)",
        "iPhone",
        "ipad",
        "Opera Mini/8.0",
        "IEMobile/10.0",
        "webos",
    ] {
        assert!(is_mobile(agent), "{agent}");
    }
    for agent in ["linux", "macos", "windows", "freebsd"] {
        assert!(!is_mobile(agent), "{agent}");
    }
}

#[test]
fn tilde_expands_only_at_the_start() {
    let home = Path::new("/home/ana");
    assert_eq!(expand_tilde("~", Some(home)), PathBuf::from("/home/ana"));
    assert_eq!(
        expand_tilde("~/Music/a.mp3", Some(home)),
        PathBuf::from("/home/ana/Music/a.mp3")
    );
    assert_eq!(expand_tilde("~other/x", Some(home)), PathBuf::from("~other/x"));
    assert_eq!(expand_tilde("a/~/b", Some(home)), PathBuf::from("a/~/b"));
    assert_eq!(expand_tilde("~/x", None), PathBuf::from("~/x"));
}

#[test]
fn chooser_input_keeps_existing_path_with_spaces_whole() {
    let dir = tempdir().unwrap();
    let spaced = dir.path().join("Queen - Bohemian Rhapsody.mp3");
    fs::write(&spaced, b"").unwrap();

    let parsed = parse_chooser_input(&format!("  {}  ", spaced.display()), None);
    assert_eq!(parsed, vec![spaced]);

    let parsed = parse_chooser_input("/nope/a.mp3 /nope/b.mp3", None);
    assert_eq!(
        parsed,
        vec![PathBuf::from("/nope/a.mp3"), PathBuf::from("/nope/b.mp3")]
    );
    assert!(parse_chooser_input("   ", None).is_empty());
}

#[test]
fn preferences_fall_back_to_memory_without_state_dir() {
    let mut prefs = open_preferences(None);
    prefs.set(AUTO_SCAN_PERMISSION, true).unwrap();
    assert_eq!(prefs.get(AUTO_SCAN_PERMISSION), Some(true));
}

#[test]
fn preferences_persist_under_state_dir() {
    let dir = tempdir().unwrap();
    {
        let mut prefs = open_preferences(Some(dir.path()));
        prefs.set(AUTO_SCAN_PERMISSION, true).unwrap();
    }
    assert!(dir.path().join("prefs.toml").exists());
    let prefs = open_preferences(Some(dir.path()));
    assert_eq!(prefs.get(AUTO_SCAN_PERMISSION), Some(true));
}

#[test]
fn quit_key_ends_the_loop() {
    let settings = Settings::default();
    let registry = MediaRegistry::new();
    let mut app = app();
    let mut state = EventLoopState::new();
    assert!(handle_key_event(
        press(KeyCode::Char('q')),
        &settings,
        &registry,
        &mut app,
        &mut state
    ));
}

#[test]
fn volume_and_mute_keys() {
    let settings = Settings::default();
    let registry = MediaRegistry::new();
    let mut app = app();
    let mut state = EventLoopState::new();

    for code in [KeyCode::Char('+'), KeyCode::Char('+'), KeyCode::Char('-')] {
        handle_key_event(press(code), &settings, &registry, &mut app, &mut state);
    }
    assert!((app.playback.volume - 0.75).abs() < 1e-4);

    handle_key_event(press(KeyCode::Char('m')), &settings, &registry, &mut app, &mut state);
    assert!(app.playback.is_muted);
    handle_key_event(press(KeyCode::Char('r')), &settings, &registry, &mut app, &mut state);
    assert!(app.playback.is_repeat_one);
}

#[test]
fn prompt_swallows_shortcuts_and_adds_typed_files() {
    let dir = tempdir().unwrap();
    let song = dir.path().join("Queen - Bohemian Rhapsody.mp3");
    fs::write(&song, b"").unwrap();
    fs::write(dir.path().join("notes.txt"), b"").unwrap();

    let settings = Settings::default();
    let registry = MediaRegistry::new();
    let mut app = app();
    let mut state = EventLoopState::new();

    handle_key_event(press(KeyCode::Char('o')), &settings, &registry, &mut app, &mut state);
    assert_eq!(app.input_mode, InputMode::AddFiles);

    // `q` is text here, not quit.
    type_line("q", &settings, &registry, &mut app, &mut state);
    handle_key_event(press(KeyCode::Backspace), &settings, &registry, &mut app, &mut state);
    type_line(
        &dir.path().display().to_string(),
        &settings,
        &registry,
        &mut app,
        &mut state,
    );
    handle_key_event(press(KeyCode::Enter), &settings, &registry, &mut app, &mut state);

    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.playlist.len(), 1);
    let track = app.current_track().unwrap();
    assert_eq!(track.name, "Bohemian Rhapsody");
    assert_eq!(track.artist, "Queen");
    assert!(!app.playback.is_playing);
}

#[test]
fn escape_closes_prompt_without_adding() {
    let settings = Settings::default();
    let registry = MediaRegistry::new();
    let mut app = app();
    let mut state = EventLoopState::new();

    handle_key_event(press(KeyCode::Char('o')), &settings, &registry, &mut app, &mut state);
    type_line("/tmp", &settings, &registry, &mut app, &mut state);
    handle_key_event(press(KeyCode::Esc), &settings, &registry, &mut app, &mut state);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.input.is_empty());
    assert!(app.playlist.is_empty());
}

#[test]
fn enter_plays_the_highlighted_row() {
    let dir = tempdir().unwrap();
    for name in ["A - X.mp3", "B - Y.mp3"] {
        fs::write(dir.path().join(name), b"").unwrap();
    }
    let settings = Settings::default();
    let registry = MediaRegistry::new();
    let mut app = app();
    let mut state = EventLoopState::new();

    let acquired = crate::library::from_paths(
        &[dir.path().to_path_buf()],
        &registry,
        &settings.library,
    );
    app.add_tracks(acquired);

    handle_key_event(press(KeyCode::Char('j')), &settings, &registry, &mut app, &mut state);
    handle_key_event(press(KeyCode::Enter), &settings, &registry, &mut app, &mut state);
    assert_eq!(app.playback.current_index, 1);
    assert!(app.playback.is_playing);
}
