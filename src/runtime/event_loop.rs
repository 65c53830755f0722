use std::env;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info, warn};

use crate::app::{App, InputMode};
use crate::audio::MediaEvent;
use crate::config;
use crate::library::{AcquireError, Acquired, MediaRegistry, from_paths, pickers_for, spawn_scan};
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::{MprisSnapshot, sync_if_changed};
use crate::runtime::startup::parse_chooser_input;
use crate::ui;

const ANIMATION_STEP: Duration = Duration::from_millis(150);

type ScanOutcome = Result<Acquired, AcquireError>;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Frame counter for the spinner and the now-playing bars.
    pub tick: u64,
    last_step: Instant,
    /// Pending device scan, if one is running.
    scan_rx: Option<Receiver<ScanOutcome>>,
    last_mpris: Option<MprisSnapshot>,
    home: Option<PathBuf>,
}

impl EventLoopState {
    pub fn new() -> Self {
        Self {
            tick: 0,
            last_step: Instant::now(),
            scan_rx: None,
            last_mpris: None,
            home: env::var_os("HOME").map(PathBuf::from),
        }
    }

    fn advance_animation(&mut self, now: Instant) {
        if now.duration_since(self.last_step) >= ANIMATION_STEP {
            self.tick = self.tick.wrapping_add(1);
            self.last_step = now;
        }
    }
}

/// Everything the loop reads from but does not own.
pub struct LoopContext<'a> {
    pub settings: &'a config::Settings,
    pub registry: &'a MediaRegistry,
    pub media_rx: &'a Receiver<MediaEvent>,
    pub mpris: &'a MprisHandle,
    pub control_rx: &'a Receiver<ControlCmd>,
}

/// Main terminal event loop: applies media notifications, scan outcomes,
/// MPRIS requests and key presses to `app`, and redraws. Returns `Ok(())`
/// when the user quits.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    ctx: &LoopContext<'_>,
    app: &mut App,
    state: &mut EventLoopState,
) -> anyhow::Result<()> {
    loop {
        let now = Instant::now();

        while let Ok(ev) = ctx.media_rx.try_recv() {
            app.on_media_event(ev, now);
        }

        poll_scan(app, state, now);
        app.tick(now);
        state.advance_animation(now);

        sync_if_changed(ctx.mpris, app, &mut state.last_mpris);

        terminal.draw(|f| {
            ui::draw(
                f,
                app,
                &ctx.settings.ui,
                &ctx.settings.controls,
                state.tick,
            )
        })?;

        while let Ok(cmd) = ctx.control_rx.try_recv() {
            if handle_control_cmd(cmd, app) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, ctx.settings, ctx.registry, app, state) {
                    return Ok(());
                }
            }
        }
    }
}

fn poll_scan(app: &mut App, state: &mut EventLoopState, now: Instant) {
    let Some(rx) = &state.scan_rx else {
        return;
    };
    match rx.try_recv() {
        Ok(outcome) => {
            app.finish_scan(outcome, now);
            state.scan_rx = None;
        }
        Err(TryRecvError::Empty) => {}
        Err(TryRecvError::Disconnected) => {
            warn!("scan worker exited without a result");
            app.finish_scan(Err(AcquireError::Picker("scan worker stopped".into())), now);
            state.scan_rx = None;
        }
    }
}

/// Start a device scan on a worker thread unless one is already running.
fn start_scan(
    settings: &config::Settings,
    registry: &MediaRegistry,
    app: &mut App,
    state: &mut EventLoopState,
) {
    if !app.begin_scan() {
        debug!("scan already in progress");
        return;
    }
    let (tx, rx) = mpsc::channel::<ScanOutcome>();
    spawn_scan(
        pickers_for(&settings.scan, &settings.library),
        registry.clone(),
        settings.library.clone(),
        tx,
    );
    state.scan_rx = Some(rx);
}

/// Returns true when the player should quit.
fn handle_control_cmd(cmd: ControlCmd, app: &mut App) -> bool {
    debug!(?cmd, "MPRIS request");
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => app.play(),
        ControlCmd::Pause => app.pause(),
        ControlCmd::PlayPause => app.toggle_play(),
        ControlCmd::Next => app.next(),
        ControlCmd::Prev => app.previous(),
    }
    false
}

/// Returns true when the player should quit.
pub(crate) fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    registry: &MediaRegistry,
    app: &mut App,
    state: &mut EventLoopState,
) -> bool {
    if app.input_mode == InputMode::AddFiles {
        handle_prompt_key(key, settings, registry, app, state);
        return false;
    }

    let scrub = i64::try_from(settings.controls.scrub_seconds).unwrap_or(i64::MAX);
    let step = settings.controls.volume_step;

    match key.code {
        KeyCode::Char('q') => {
            info!("quit requested");
            return true;
        }
        KeyCode::Char(' ') | KeyCode::Char('p') => app.toggle_play(),
        KeyCode::Char('l') => app.next(),
        KeyCode::Char('h') => app.previous(),
        KeyCode::Char('L') => app.seek_by(scrub),
        KeyCode::Char('H') => app.seek_by(-scrub),
        KeyCode::Char('+') | KeyCode::Char('=') => app.step_volume(step),
        KeyCode::Char('-') => app.step_volume(-step),
        KeyCode::Char('m') => app.toggle_mute(),
        KeyCode::Char('r') => app.toggle_repeat(),
        KeyCode::Char('j') | KeyCode::Down => app.cursor_down(),
        KeyCode::Char('k') | KeyCode::Up => app.cursor_up(),
        KeyCode::Enter => {
            if app.has_tracks() {
                app.select_track(app.cursor);
            }
        }
        KeyCode::Char('o') => app.open_chooser(),
        KeyCode::Char('s') => start_scan(settings, registry, app, state),
        _ => {}
    }
    false
}

fn handle_prompt_key(
    key: KeyEvent,
    settings: &config::Settings,
    registry: &MediaRegistry,
    app: &mut App,
    state: &EventLoopState,
) {
    match key.code {
        KeyCode::Esc => app.close_chooser(),
        KeyCode::Backspace => app.pop_input_char(),
        KeyCode::Enter => {
            let Some(typed) = app.submit_chooser() else {
                return;
            };
            let paths = parse_chooser_input(&typed, state.home.as_deref());
            let acquired = from_paths(&paths, registry, &settings.library);
            app.add_manual(acquired, Instant::now());
        }
        KeyCode::Char(c) if !c.is_control() => app.push_input_char(c),
        _ => {}
    }
}
