use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::app::{App, Mode};
use crate::audio::{AudioSink, SinkEvent};
use crate::config;
use crate::cover::{ArtFetcher, ArtReply};
use crate::mpris::{ControlCmd, MprisHandle};
use crate::playback::SeekTarget;
use crate::playlist::Direction;
use crate::session::SessionStore;
use crate::ui;

use super::keys::{Action, PromptAction, map_key, map_prompt_key};
use super::mpris_sync::MprisSync;
use super::startup::{ScanOutcome, start_scan};

/// Receiving ends of every worker, drained once per iteration.
pub struct Channels {
    pub sink_events: Receiver<SinkEvent>,
    pub art_replies: Receiver<ArtReply>,
    pub scans: Receiver<ScanOutcome>,
    pub scan_tx: Sender<ScanOutcome>,
    pub controls: Receiver<ControlCmd>,
}

/// Main terminal event loop: drains worker messages into `app`, draws, and
/// handles input. Returns `Ok(())` when shutdown is requested.
pub fn run<S: AudioSink, F: ArtFetcher>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<S, F>,
    store: &dyn SessionStore,
    mpris: &MprisHandle,
    channels: &Channels,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mpris_sync = MprisSync::default();

    loop {
        while let Ok(ev) = channels.sink_events.try_recv() {
            app.on_sink_event(ev);
        }

        while let Ok(reply) = channels.art_replies.try_recv() {
            let outcome = app.on_art_reply(reply);
            debug!(?outcome, "art reply");
        }

        while let Ok(ScanOutcome {
            ticket,
            directory,
            result,
        }) = channels.scans.try_recv()
        {
            app.on_scan_finished(ticket, directory, result);
        }

        while let Ok(cmd) = channels.controls.try_recv() {
            if handle_control_cmd(cmd, app) {
                return Ok(());
            }
        }

        if settings.session.save_on_change && app.take_session_dirty() {
            store.save(&app.session_snapshot());
        }

        // Keep MPRIS in sync even when changes come from media keys or auto-advance.
        mpris_sync.update(mpris, app);

        terminal.draw(|f| ui::draw(f, app, settings))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, channels) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Returns `true` when the player should quit.
fn handle_control_cmd<S: AudioSink, F: ArtFetcher>(cmd: ControlCmd, app: &mut App<S, F>) -> bool {
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => app.play(),
        ControlCmd::Pause => app.pause(),
        ControlCmd::PlayPause => app.toggle_play_pause(),
        ControlCmd::Stop => app.stop(),
        ControlCmd::Next => {
            app.on_user_navigate(Direction::Next);
        }
        ControlCmd::Prev => {
            app.on_user_navigate(Direction::Previous);
        }
    }
    false
}

/// Returns `true` when the player should quit.
fn handle_key_event<S: AudioSink, F: ArtFetcher>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App<S, F>,
    channels: &Channels,
) -> bool {
    if app.mode == Mode::DirectoryPrompt {
        match map_prompt_key(&key) {
            Some(PromptAction::Submit) => {
                if let Some(dir) = app.submit_prompt() {
                    start_scan(app, dir, &settings.library, &channels.scan_tx);
                }
            }
            Some(PromptAction::Cancel) => app.cancel_prompt(),
            Some(PromptAction::Backspace) => {
                app.prompt.pop();
            }
            Some(PromptAction::Insert(c)) => app.prompt.push(c),
            None => {}
        }
        return false;
    }

    match map_key(&key, &settings.controls) {
        Some(Action::Quit) => return true,
        Some(Action::TogglePlayPause) => app.toggle_play_pause(),
        Some(Action::Navigate(direction)) => {
            app.on_user_navigate(direction);
        }
        Some(Action::First) => {
            app.jump_to(0);
        }
        Some(Action::Last) => {
            let len = app.playlist().len();
            app.jump_to(len.saturating_sub(1));
        }
        Some(Action::Volume(delta)) => {
            app.nudge_volume(delta);
        }
        Some(Action::Scrub(secs)) => app.seek_by(secs),
        Some(Action::SeekFraction(f)) => app.seek(SeekTarget::Fraction(f)),
        Some(Action::OpenPrompt) => app.open_prompt(),
        None => {}
    }
    false
}
