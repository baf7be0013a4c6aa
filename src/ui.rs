//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, Mode};
use crate::audio::AudioSink;
use crate::config::{ControlsSettings, Settings, UiSettings};
use crate::cover::{ArtFetcher, CoverArt, CoverImage, ThumbnailSize};
use crate::playback::{PlaybackRuntime, PlayerState};

/// Render the controls help text, incorporating scrub seconds and volume step.
fn controls_text(controls: &ControlsSettings) -> String {
    [
        "[space] play/pause".to_string(),
        "[←/↑ →/↓] prev/next".to_string(),
        "[home/end] first/last".to_string(),
        format!("[H/L] scrub -/+{}s", controls.scrub_seconds),
        format!("[-/+] volume -/+{}", controls.volume_step),
        "[0-9] seek 0-90%".to_string(),
        "[o] open dir".to_string(),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

/// Format seconds as `MM:SS`; negative or non-finite input shows `00:00`.
fn format_mmss(secs: f64) -> String {
    let secs = if secs.is_finite() { secs.max(0.0) as u64 } else { 0 };
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Elapsed and total time, e.g. `03:12 | 04:00`; the total shows `--:--` while unknown.
fn time_text(runtime: &PlaybackRuntime, ui: &UiSettings) -> String {
    let total = if runtime.duration_secs > 0.0 {
        format_mmss(runtime.duration_secs)
    } else {
        "--:--".to_string()
    };
    format!(
        "{}{}{}",
        format_mmss(runtime.current_time_secs),
        ui.time_separator,
        total
    )
}

fn state_text(state: PlayerState) -> &'static str {
    match state {
        PlayerState::Idle => "Stopped",
        PlayerState::Paused => "Paused",
        PlayerState::Playing => "Playing",
        PlayerState::Ended => "Ended",
    }
}

/// Visible slice `[start, end)` of a list of `total` rows in `height` rows,
/// keeping `selected` centered when possible; also returns its row.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize, usize) {
    if total <= height || height == 0 {
        return (0, total, selected);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

/// Half-block rendering: each cell shows two pixel rows, the upper one as
/// foreground of `▀` and the lower one as background.
fn cover_lines(image: &CoverImage) -> Vec<Line<'static>> {
    (0..image.thumb_height.div_ceil(2))
        .map(|row| {
            let spans: Vec<Span<'static>> = (0..image.thumb_width)
                .map(|x| {
                    let top = image.pixel(x, row * 2).unwrap_or([0, 0, 0]);
                    let style = Style::default().fg(Color::Rgb(top[0], top[1], top[2]));
                    let style = match image.pixel(x, row * 2 + 1) {
                        Some(b) => style.bg(Color::Rgb(b[0], b[1], b[2])),
                        None => style,
                    };
                    Span::styled("▀", style)
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn left_padded() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

fn draw_playlist<S: AudioSink, F: ArtFetcher>(frame: &mut Frame, area: Rect, app: &App<S, F>) {
    let tracks = app.playlist().catalog().tracks();

    // Only build ListItems for the visible window.
    let list_height = area.height.saturating_sub(2) as usize;
    let selected = app.playlist().current_index().unwrap_or(0);
    let (start, end, selected_row) = visible_window(tracks.len(), list_height, selected);

    let items: Vec<ListItem> = tracks[start..end]
        .iter()
        .map(|t| ListItem::new(format!("{:>3}. {}", t.ordinal + 1, t.name)))
        .collect();

    let title = if app.scan_pending() {
        " tracks (scanning…) ".to_string()
    } else {
        format!(" tracks ({}) ", tracks.len())
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if app.playlist().current_index().is_some() {
        state.select(Some(selected_row));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_now_playing<S: AudioSink, F: ArtFetcher>(
    frame: &mut Frame,
    area: Rect,
    app: &App<S, F>,
    settings: &Settings,
) {
    let block = Block::default().borders(Borders::ALL).title(" now playing ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let thumb = ThumbnailSize::from_settings(&settings.cover);
    let cover_height = if settings.ui.show_cover {
        thumb.height.min(u16::MAX as u32) as u16
    } else {
        0
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(cover_height),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    if settings.ui.show_cover {
        let cover = match &app.cover().art {
            CoverArt::Image(image) => Paragraph::new(cover_lines(image)),
            CoverArt::Placeholder => Paragraph::new(vec![
                Line::from(""),
                Line::from("♪").bold(),
                Line::from("no cover").dim(),
            ]),
        };
        frame.render_widget(cover.alignment(Alignment::Center), rows[0]);
    }

    let info = match app.playlist().current() {
        Some(track) => vec![
            Line::from(track.artist.clone()).bold(),
            Line::from(track.name.clone()),
            Line::from(state_text(app.player_state())).dim(),
        ],
        None => vec![Line::from("nothing loaded").dim()],
    };
    frame.render_widget(
        Paragraph::new(info)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        rows[1],
    );

    let runtime = app.runtime();
    let gauge = Gauge::default()
        .ratio(runtime.progress())
        .label(time_text(runtime, &settings.ui))
        .use_unicode(true);
    frame.render_widget(gauge, rows[2]);
}

fn draw_prompt<S: AudioSink, F: ArtFetcher>(frame: &mut Frame, app: &App<S, F>) {
    let area = centered_rect_sized(64, 3, frame.area());
    frame.render_widget(Clear, area);
    let prompt = Paragraph::new(format!("{}▏", app.prompt)).block(
        Block::default()
            .borders(Borders::ALL)
            .padding(left_padded())
            .title(" open directory (enter opens, esc cancels) "),
    );
    frame.render_widget(prompt, area);
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw<S: AudioSink, F: ArtFetcher>(frame: &mut Frame, app: &App<S, F>, settings: &Settings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(settings.ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" tapedeck ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let panel_width = (settings.cover.thumbnail_width.min(200) as u16 + 4).max(32);
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(panel_width)])
        .split(chunks[1]);
    draw_playlist(frame, body[0], app);
    draw_now_playing(frame, body[1], app, settings);

    // Status line
    let mut parts: Vec<String> = Vec::new();
    match &app.session().directory {
        Some(dir) => parts.push(format!("Dir: {}", dir.display())),
        None => parts.push("No directory (press o)".to_string()),
    }
    parts.push(format!("Vol: {}", app.runtime().volume));
    if let Some(msg) = &app.status {
        parts.push(msg.clone());
    }
    let status = Paragraph::new(parts.join(" • "))
        .block(Block::bordered().padding(left_padded()).title(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[2]);

    let footer = Paragraph::new(controls_text(&settings.controls))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(left_padded()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);

    if app.mode == Mode::DirectoryPrompt {
        draw_prompt(frame, app);
    }
}
