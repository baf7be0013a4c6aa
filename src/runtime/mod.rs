use std::env;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::audio::RodioSink;
use crate::cover::{ArtService, LoftyExtractor, ThumbnailSize};
use crate::mpris::ControlCmd;
use crate::session::{FileSessionStore, SessionStore, resolve_session_path};

mod event_loop;
mod keys;
mod logging;
mod mpris_sync;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_warning) = settings::load_settings();

    let _log_guard = match logging::init_logging(&settings.logging) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("tapedeck: logging disabled: {e}");
            None
        }
    };
    if let Some(msg) = config_warning {
        warn!("{msg}");
    }

    let store = FileSessionStore::new(resolve_session_path(&settings.session));
    let session = store.load();
    info!(session = %store.path().display(), ?session, "session restored");

    let (sink_tx, sink_rx) = mpsc::channel();
    let sink = RodioSink::spawn(settings.audio.clone(), sink_tx)?;

    let (art_tx, art_rx) = mpsc::channel();
    let fetcher = ArtService::spawn(
        LoftyExtractor::new(settings.cover.max_bytes),
        ThumbnailSize::from_settings(&settings.cover),
        art_tx,
    );

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);

    let (scan_tx, scan_rx) = mpsc::channel();
    let channels = event_loop::Channels {
        sink_events: sink_rx,
        art_replies: art_rx,
        scans: scan_rx,
        scan_tx,
        controls: control_rx,
    };

    let mut app = App::new(sink, fetcher, session);

    match startup::initial_directory(env::args().nth(1), app.session()) {
        Some(dir) => startup::start_scan(&mut app, dir, &settings.library, &channels.scan_tx),
        None => app.status = Some("press o to open a directory".to_string()),
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &store, &mpris, &channels);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // An eager save may already hold the latest state.
    if !settings.session.save_on_change || app.take_session_dirty() {
        store.save(&app.session_snapshot());
    }
    app.controller()
        .sink()
        .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
    info!("bye");

    run_result
}
