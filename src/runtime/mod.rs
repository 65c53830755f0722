use std::env;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::{App, AppOptions};
use crate::audio::AudioPlayer;
use crate::config::default_state_dir;
use crate::library::{MediaRegistry, from_paths};
use crate::logging;
use crate::mpris::ControlCmd;

mod event_loop;
mod mpris_sync;
mod settings;
mod startup;

pub fn run() -> anyhow::Result<()> {
    let (settings, config_problem) = settings::load_settings();

    match logging::init(&settings.log) {
        Ok(path) => info!(log = %path.display(), "senpro starting"),
        // The alternate screen keeps this visible after exit.
        Err(e) => eprintln!("senpro: logging disabled: {e:#}"),
    }
    if let Some(problem) = config_problem {
        warn!("{problem}");
    }

    let registry = MediaRegistry::new();
    let (player, media_rx) = AudioPlayer::new(registry.clone(), settings.audio.clone());
    let state_dir = default_state_dir();
    let prefs = startup::open_preferences(state_dir.as_deref());
    let mut app = App::new(Box::new(player), prefs, AppOptions::from_settings(&settings));

    let agent = startup::host_agent();
    let is_mobile = startup::is_mobile(&agent);
    info!(agent, is_mobile, "host detected");
    app.mount(is_mobile, Instant::now());

    let cli_paths: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();
    if !cli_paths.is_empty() {
        let acquired = from_paths(&cli_paths, &registry, &settings.library);
        app.add_manual(acquired, Instant::now());
    }

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);

    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let ctx = event_loop::LoopContext {
        settings: &settings,
        registry: &registry,
        media_rx: &media_rx,
        mpris: &mpris,
        control_rx: &control_rx,
    };
    let mut state = event_loop::EventLoopState::new();
    let run_result = event_loop::run(&mut terminal, &ctx, &mut app, &mut state);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.shutdown(Duration::from_millis(settings.audio.quit_fade_out_ms));
    info!(live_urls = registry.live(), "senpro stopped");

    run_result
}

#[cfg(test)]
mod tests;
