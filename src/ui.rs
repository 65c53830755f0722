//! UI rendering helpers for the terminal user interface.
//!
//! Everything here is a pure function of `App` plus settings; the runtime
//! decides when to redraw.

use std::str::FromStr;
use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, LineGauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, InputMode};
use crate::config::{ControlsSettings, ThemeSettings, UiSettings};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];
const BARS: [&str; 4] = ["▁▃▅", "▃▅▂", "▅▂▄", "▂▄▃"];

/// Resolved theme colors.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub accent: Color,
    pub highlight: Color,
    pub dim: Color,
}

impl Theme {
    /// Parse the configured colors, falling back per field to the defaults.
    pub fn from_settings(theme: &ThemeSettings) -> Self {
        let parse = |s: &str, fallback: Color| Color::from_str(s.trim()).unwrap_or(fallback);
        Self {
            accent: parse(&theme.accent, Color::Blue),
            highlight: parse(&theme.highlight, Color::LightBlue),
            dim: parse(&theme.dim, Color::Gray),
        }
    }
}

/// Format a `Duration` as `M:SS` (minutes are not padded).
pub fn format_time(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Fraction of the track already played, in `[0, 1]`.
fn progress_ratio(elapsed: Duration, total: Duration) -> f64 {
    if total.is_zero() {
        return 0.0;
    }
    (elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
}

/// Render the controls help text, incorporating the configured steps.
fn controls_text(controls: &ControlsSettings) -> String {
    let volume_pct = (controls.volume_step * 100.0).round() as u32;
    [
        "[space/p] reproducir/pausa".to_string(),
        "[h/l] anterior/siguiente".to_string(),
        format!("[H/L] -/+{}s", controls.scrub_seconds),
        format!("[-/+] volumen {volume_pct}%"),
        "[m] silencio".to_string(),
        "[r] repetir".to_string(),
        "[j/k] mover".to_string(),
        "[enter] reproducir selección".to_string(),
        "[o] añadir archivos".to_string(),
        "[s] escanear música".to_string(),
        "[q] salir".to_string(),
    ]
    .join(" | ")
}

fn padded() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

/// Render the entire UI into `frame`. `tick` drives the spinner and the
/// now-playing bars.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
    tick: u64,
) {
    let theme = Theme::from_settings(&ui_settings.theme);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Min(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" senpro ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    draw_status(frame, app, chunks[1], &theme, tick);
    draw_player(frame, app, chunks[2], &theme);
    draw_playlist(frame, app, chunks[3], &theme, tick);

    if app.input_mode == InputMode::AddFiles {
        draw_prompt(frame, app, chunks[4], &theme);
    } else {
        let footer = Paragraph::new(controls_text(controls_settings))
            .style(Style::default().fg(theme.dim))
            .block(Block::default().borders(Borders::ALL).title(" controles ").padding(padded()))
            .wrap(Wrap { trim: true });
        frame.render_widget(footer, chunks[4]);
    }
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect, theme: &Theme, tick: u64) {
    let mut spans = Vec::new();
    if app.scanning {
        let glyph = SPINNER[(tick as usize) % SPINNER.len()];
        spans.push(Span::styled(format!("{glyph} "), Style::default().fg(theme.accent)));
    }
    if let Some(msg) = app.status.message() {
        spans.push(Span::raw(msg.to_string()));
    }
    let status = Paragraph::new(Line::from(spans))
        .block(Block::bordered().padding(padded()).title(" estado "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, area);
}

fn draw_player(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let block = Block::bordered().padding(padded()).title(" reproduciendo ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let Some(track) = app.current_track() else {
        let empty = Paragraph::new("Añade canciones con «o» o escanea con «s».")
            .style(Style::default().fg(theme.dim));
        frame.render_widget(empty, rows[0]);
        return;
    };

    let title = Line::from(vec![
        Span::styled(
            track.name.clone(),
            Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {}", track.artist), Style::default().fg(theme.dim)),
    ]);
    frame.render_widget(Paragraph::new(title), rows[0]);

    let p = &app.playback;
    let progress = LineGauge::default()
        .filled_style(Style::default().fg(theme.accent))
        .unfilled_style(Style::default().fg(theme.dim))
        .ratio(progress_ratio(p.current_time, p.duration))
        .label(format!(
            "{} / {}",
            format_time(p.current_time),
            format_time(p.duration)
        ));
    frame.render_widget(progress, rows[1]);

    let state = if p.is_playing { "▶ reproduciendo" } else { "⏸ en pausa" };
    let repeat = if p.is_repeat_one { "🔂 repetir: sí" } else { "repetir: no" };
    let mute = if p.is_muted { "🔇 silencio" } else { "🔊" };
    let transport = Line::from(vec![
        Span::styled(state, Style::default().fg(theme.highlight)),
        Span::raw("  •  "),
        Span::raw(repeat),
        Span::raw("  •  "),
        Span::raw(mute),
    ]);
    frame.render_widget(Paragraph::new(transport), rows[2]);

    let volume_pct = (app.effective_volume() * 100.0).round() as u16;
    let volume = Gauge::default()
        .gauge_style(Style::default().fg(theme.accent))
        .percent(volume_pct.min(100))
        .label(format!("volumen {volume_pct}%"));
    frame.render_widget(volume, rows[3]);
}

fn draw_playlist(frame: &mut Frame, app: &App, area: Rect, theme: &Theme, tick: u64) {
    let current = app.playback.current_index;
    let items: Vec<ListItem> = app
        .playlist
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let is_current = i == current;
            let marker = if is_current && app.playback.is_playing {
                BARS[(tick as usize) % BARS.len()]
            } else {
                "   "
            };
            let style = if is_current {
                Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{marker} "), Style::default().fg(theme.accent)),
                Span::styled(track.name.clone(), style),
                Span::styled(format!(" - {}", track.artist), Style::default().fg(theme.dim)),
            ]))
        })
        .collect();

    let title = format!(" lista ({}) ", app.playlist.len());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if app.has_tracks() {
        state.select(Some(app.cursor.min(app.playlist.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_prompt(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let prompt = Paragraph::new(app.input.as_str())
        .style(Style::default().fg(theme.highlight))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" añadir archivos (rutas separadas por espacios, enter confirma, esc cancela) ")
                .padding(padded()),
        );
    frame.render_widget(prompt, area);

    // Border (1) + padding (1) before the text starts.
    let typed = u16::try_from(app.input.chars().count()).unwrap_or(u16::MAX);
    let x = area.x.saturating_add(2).saturating_add(typed);
    let max_x = area.x.saturating_add(area.width.saturating_sub(2));
    frame.set_cursor_position(Position::new(x.min(max_x), area.y + 1));
}

#[cfg(test)]
mod tests;
