use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread;

use tracing::debug;

use crate::app::{App, ScanRequest, ScanTicket, expand_tilde};
use crate::audio::AudioSink;
use crate::config::LibrarySettings;
use crate::cover::ArtFetcher;
use crate::library::{Catalog, ScanError, build_catalog};
use crate::session::SessionState;

/// A finished scan on its way back to the event loop.
#[derive(Debug)]
pub struct ScanOutcome {
    pub ticket: ScanTicket,
    pub directory: PathBuf,
    pub result: Result<Catalog, ScanError>,
}

/// Directory to open at startup: the command-line argument, else the one the
/// last session was playing.
pub fn initial_directory(arg: Option<String>, session: &SessionState) -> Option<PathBuf> {
    arg.filter(|a| !a.trim().is_empty())
        .map(|a| expand_tilde(a.trim()))
        .or_else(|| session.directory.clone())
}

/// Ask `app` for a scan ticket and run the scan on a worker thread.
pub fn start_scan<S: AudioSink, F: ArtFetcher>(
    app: &mut App<S, F>,
    directory: PathBuf,
    library: &LibrarySettings,
    tx: &Sender<ScanOutcome>,
) {
    let ScanRequest { ticket, directory } = app.request_scan(directory);
    let library = library.clone();
    let tx = tx.clone();

    thread::spawn(move || {
        debug!(?ticket, dir = %directory.display(), "scan started");
        let result = build_catalog(&directory, &library);
        let _ = tx.send(ScanOutcome {
            ticket,
            directory,
            result,
        });
    });
}
