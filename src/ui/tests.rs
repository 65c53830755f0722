use super::*;

use std::path::Path;
use std::time::Duration;

use ratatui::{Terminal, backend::TestBackend};

use crate::app::{App, AppOptions};
use crate::audio::MediaElement;
use crate::config::Settings;
use crate::library::{Acquired, MediaRegistry, SourceFile, Track};
use crate::prefs::MemoryPreferences;

struct Silent;

impl MediaElement for Silent {
    fn load(&mut self, _url: &str) {}
    fn play(&mut self) {}
    fn pause(&mut self) {}
    fn seek(&mut self, _position: Duration) {}
    fn set_volume(&mut self, _volume: f32) {}
}

fn app_with(registry: &MediaRegistry, names: &[(&str, &str)]) -> App {
    let mut app = App::new(
        Box::new(Silent),
        Box::new(MemoryPreferences::default()),
        AppOptions::default(),
    );
    let tracks = names
        .iter()
        .map(|(name, artist)| {
            let path = Path::new("/music").join(format!("{artist} - {name}.mp3"));
            Track {
                name: name.to_string(),
                artist: artist.to_string(),
                url: registry.register(&path),
                source: SourceFile {
                    path,
                    media_type: "audio/mpeg",
                },
            }
        })
        .collect();
    app.add_tracks(Acquired { tracks, skipped: 0 });
    app
}

fn render(app: &App) -> String {
    render_at(app, 0)
}

fn render_at(app: &App, tick: u64) -> String {
    let settings = Settings::default();
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal
        .draw(|f| draw(f, app, &settings.ui, &settings.controls, tick))
        .unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect()
}

#[test]
fn format_time_is_minutes_and_padded_seconds() {
    assert_eq!(format_time(Duration::ZERO), "0:00");
    assert_eq!(format_time(Duration::from_millis(65_900)), "1:05");
    assert_eq!(format_time(Duration::from_secs(3_600)), "60:00");
}

#[test]
fn progress_ratio_handles_unknown_duration() {
    assert_eq!(progress_ratio(Duration::from_secs(5), Duration::ZERO), 0.0);
    assert_eq!(
        progress_ratio(Duration::from_secs(30), Duration::from_secs(60)),
        0.5
    );
    assert_eq!(
        progress_ratio(Duration::from_secs(90), Duration::from_secs(60)),
        1.0
    );
}

#[test]
fn theme_falls_back_per_field() {
    let theme = Theme::from_settings(&ThemeSettings {
        accent: "#ff8800".to_string(),
        highlight: "not-a-color".to_string(),
        dim: "darkgray".to_string(),
    });
    assert_eq!(theme.accent, Color::Rgb(0xff, 0x88, 0x00));
    assert_eq!(theme.highlight, Color::LightBlue);
    assert_eq!(theme.dim, Color::DarkGray);
}

#[test]
fn controls_text_uses_configured_steps() {
    let text = controls_text(&ControlsSettings {
        scrub_seconds: 10,
        volume_step: 0.1,
    });
    assert!(text.contains("[H/L] -/+10s"));
    assert!(text.contains("volumen 10%"));
}

#[test]
fn empty_player_shows_hint() {
    let registry = MediaRegistry::new();
    let app = app_with(&registry, &[]);
    let screen = render(&app);
    assert!(screen.contains("Añade canciones"));
    assert!(screen.contains("lista (0)"));
}

#[test]
fn current_track_and_playlist_are_rendered() {
    let registry = MediaRegistry::new();
    let app = app_with(&registry, &[("Bohemian Rhapsody", "Queen"), ("Numb", "Linkin Park")]);
    let screen = render(&app);
    assert!(screen.contains("Bohemian Rhapsody"));
    assert!(screen.contains("Linkin Park"));
    assert!(screen.contains("0:00 / 0:00"));
    assert!(screen.contains("lista (2)"));
}

#[test]
fn prompt_replaces_footer_while_open() {
    let registry = MediaRegistry::new();
    let mut app = app_with(&registry, &[]);
    app.open_chooser();
    for c in "~/x.mp3".chars() {
        app.push_input_char(c);
    }
    let screen = render(&app);
    assert!(screen.contains("~/x.mp3"));
    assert!(!screen.contains("controles"));
}

#[test]
fn scan_in_progress_shows_spinner() {
    let registry = MediaRegistry::new();
    let mut app = app_with(&registry, &[]);
    assert!(app.begin_scan());

    assert!(render_at(&app, 1).contains("/ Escaneando música..."));
    assert!(render_at(&app, 2).contains("- Escaneando música..."));
}

#[test]
fn bars_follow_the_current_track_only_while_playing() {
    let registry = MediaRegistry::new();
    let mut app = app_with(&registry, &[("Bohemian Rhapsody", "Queen"), ("Numb", "Linkin Park")]);
    let has_bars = |screen: &str| screen.chars().any(|c| "▁▂▃▄▅".contains(c));

    app.play();
    let screen = render_at(&app, 2);
    assert!(screen.contains(&format!("{} Bohemian Rhapsody", BARS[2])));
    assert!(!screen.contains(&format!("{} Numb", BARS[2])));

    app.pause();
    assert!(!has_bars(&render_at(&app, 2)));
}

#[test]
fn long_prompt_input_keeps_cursor_inside() {
    let registry = MediaRegistry::new();
    let mut app = app_with(&registry, &[]);
    app.open_chooser();
    for _ in 0..70_000 {
        app.push_input_char('x');
    }
    let screen = render(&app);
    assert!(screen.contains("xxxx"));
}
