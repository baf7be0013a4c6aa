//! Application model: `App`, the player session orchestrator.
//!
//! `App` owns the playlist cursor, the playback controller, the cover art
//! resolver and the session state. Every outside stimulus (scan finished,
//! track ended, key press, sink event, art reply) enters through one of its
//! transition functions; the runtime only moves messages around.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::audio::{AudioSink, SinkEvent};
use crate::cover::{ArtFetcher, ArtReply, CoverArtResolver, CoverArtResult, ResolveOutcome};
use crate::library::{Catalog, ScanError};
use crate::playback::{PlaybackController, PlaybackRuntime, PlayerState, SeekTarget, SinkSignal};
use crate::playlist::{Direction, Playlist};
use crate::session::{SessionState, Volume};

/// Identity of one directory scan; only the latest one is applied.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ScanTicket(pub u64);

impl ScanTicket {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// A scan the runtime should run on a worker thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub ticket: ScanTicket,
    pub directory: PathBuf,
}

/// Which input the keyboard is feeding.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    /// Typing a directory path.
    DirectoryPrompt,
}

/// The main application model.
pub struct App<S: AudioSink, F: ArtFetcher> {
    playlist: Playlist,
    controller: PlaybackController<S>,
    cover: CoverArtResolver,
    fetcher: F,
    session: SessionState,

    /// Index restored at startup, waiting for the catalog of its directory.
    restore: Option<(PathBuf, usize)>,
    last_scan: ScanTicket,
    pending_scan: Option<ScanRequest>,
    session_dirty: bool,

    pub mode: Mode,
    pub prompt: String,
    pub status: Option<String>,
}

impl<S: AudioSink, F: ArtFetcher> App<S, F> {
    /// Create an `App` seeded from the restored `session`.
    pub fn new(sink: S, fetcher: F, session: SessionState) -> Self {
        let restore = session
            .directory
            .clone()
            .map(resolve_directory)
            .zip(session.current_index);
        let controller = PlaybackController::new(sink, session.volume);

        Self {
            playlist: Playlist::new(),
            controller,
            cover: CoverArtResolver::new(),
            fetcher,
            session,
            restore,
            last_scan: ScanTicket::default(),
            pending_scan: None,
            session_dirty: false,
            mode: Mode::Normal,
            prompt: String::new(),
            status: None,
        }
    }

    /// Start a scan of `directory`; any scan still running becomes stale.
    ///
    /// Relative paths are resolved against the working directory, so the
    /// session only ever records absolute directories.
    pub fn request_scan(&mut self, directory: PathBuf) -> ScanRequest {
        self.last_scan = self.last_scan.next();
        let request = ScanRequest {
            ticket: self.last_scan,
            directory: resolve_directory(directory),
        };
        self.status = Some(format!("scanning {}", request.directory.display()));
        self.pending_scan = Some(request.clone());
        request
    }

    /// Apply a finished scan. Returns `true` when a new catalog was loaded.
    ///
    /// Results of superseded scans are dropped; a failed scan leaves the
    /// current playlist and session alone.
    pub fn on_scan_finished(
        &mut self,
        ticket: ScanTicket,
        directory: PathBuf,
        result: Result<Catalog, ScanError>,
    ) -> bool {
        if self.pending_scan.as_ref().map(|p| p.ticket) != Some(ticket) {
            debug!(?ticket, "dropping stale scan result");
            return false;
        }
        self.pending_scan = None;

        match result {
            Ok(catalog) => {
                self.on_catalog_loaded(directory, catalog);
                true
            }
            Err(e) => {
                warn!("scan failed: {e}");
                self.status = Some(e.to_string());
                false
            }
        }
    }

    /// Install the catalog of `directory` and start playing its current track.
    pub fn on_catalog_loaded(&mut self, directory: PathBuf, catalog: Catalog) {
        let restored = match self.restore.take() {
            Some((dir, index)) if dir == directory => Some(index),
            _ => None,
        };

        info!(dir = %directory.display(), tracks = catalog.len(), ?restored, "catalog loaded");
        self.status = catalog
            .is_empty()
            .then(|| format!("no audio files in {}", directory.display()));

        self.playlist.set_catalog(catalog, restored);
        self.session.directory = Some(directory);
        self.session.current_index = self.playlist.current_index();
        self.session_dirty = true;
        self.rebind();
    }

    /// Manual next/previous. Ignored while a scan is pending or nothing is loaded.
    pub fn on_user_navigate(&mut self, direction: Direction) -> bool {
        if self.scan_pending() || self.playlist.is_empty() {
            return false;
        }
        self.playlist.step(direction);
        self.after_move();
        true
    }

    /// The current track ran out: advance (wrapping) and keep playing.
    pub fn on_track_ended(&mut self) {
        if self.playlist.is_empty() {
            return;
        }
        self.playlist.next();
        self.after_move();
    }

    /// Make track `index` current. Out of range (or during a scan) is a no-op.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if self.scan_pending() || !self.playlist.jump_to(index) {
            return false;
        }
        self.after_move();
        true
    }

    pub fn toggle_play_pause(&mut self) {
        self.controller.toggle_play_pause();
    }

    pub fn play(&mut self) {
        self.controller.play();
    }

    pub fn pause(&mut self) {
        self.controller.pause();
    }

    /// Pause and rewind to the start of the current track.
    pub fn stop(&mut self) {
        self.controller.pause();
        self.controller.seek(SeekTarget::Seconds(0.0));
    }

    pub fn seek(&mut self, target: SeekTarget) {
        self.controller.seek(target);
    }

    pub fn seek_by(&mut self, delta_secs: f64) {
        self.controller.seek_by(delta_secs);
    }

    /// Set the volume (clamped) and mirror it into the session.
    pub fn set_volume(&mut self, percent: i64) -> Volume {
        let volume = self.controller.set_volume(percent);
        if self.session.volume != volume {
            self.session.volume = volume;
            self.session_dirty = true;
        }
        volume
    }

    pub fn nudge_volume(&mut self, delta: i64) -> Volume {
        let current = self.controller.runtime().volume.percent() as i64;
        self.set_volume(current + delta)
    }

    pub fn on_sink_event(&mut self, event: SinkEvent) {
        match self.controller.on_sink_event(event) {
            Some(SinkSignal::TrackEnded) => self.on_track_ended(),
            Some(SinkSignal::LoadFailed(reason)) => {
                let name = self
                    .playlist
                    .current()
                    .map(|t| t.name.clone())
                    .unwrap_or_default();
                warn!(track = %name, "cannot play: {reason}");
                self.status = Some(format!("cannot play {name}: {reason}"));
            }
            None => {}
        }
    }

    pub fn on_art_reply(&mut self, reply: ArtReply) -> ResolveOutcome {
        let current = self.playlist.current().map(|t| t.path.as_path());
        self.cover.resolve(reply, current)
    }

    /// The session as it should be persisted right now.
    pub fn session_snapshot(&self) -> SessionState {
        self.session.clone()
    }

    /// Whether the session changed since the last call.
    pub fn take_session_dirty(&mut self) -> bool {
        std::mem::take(&mut self.session_dirty)
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn controller(&self) -> &PlaybackController<S> {
        &self.controller
    }

    pub fn player_state(&self) -> PlayerState {
        self.controller.state()
    }

    pub fn runtime(&self) -> &PlaybackRuntime {
        self.controller.runtime()
    }

    pub fn cover(&self) -> &CoverArtResult {
        self.cover.shown()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn scan_pending(&self) -> bool {
        self.pending_scan.is_some()
    }

    /// Open the directory prompt with an empty buffer.
    pub fn open_prompt(&mut self) {
        self.mode = Mode::DirectoryPrompt;
        self.prompt.clear();
    }

    pub fn cancel_prompt(&mut self) {
        self.mode = Mode::Normal;
        self.prompt.clear();
    }

    /// Close the prompt and return the chosen directory; blank input counts
    /// as cancelled.
    pub fn submit_prompt(&mut self) -> Option<PathBuf> {
        self.mode = Mode::Normal;
        let input = std::mem::take(&mut self.prompt);
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        Some(expand_tilde(input))
    }

    fn after_move(&mut self) {
        self.session.current_index = self.playlist.current_index();
        self.session_dirty = true;
        self.rebind();
    }

    // Sink first, then art: the art request always follows the rebind.
    fn rebind(&mut self) {
        let current = self.playlist.current();
        self.controller.bind(current);
        if let Some(request) = self.cover.begin(current) {
            self.fetcher.request(request);
        }
    }
}

/// Make `dir` absolute without touching the filesystem. Falls back to `dir`
/// when there is no working directory to resolve against.
pub fn resolve_directory(dir: PathBuf) -> PathBuf {
    std::path::absolute(&dir).unwrap_or(dir)
}

/// Expand a leading `~` to `$HOME`.
pub fn expand_tilde(input: &str) -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    match (input, home) {
        ("~", Some(home)) => home,
        (s, Some(home)) if s.starts_with("~/") => home.join(&s[2..]),
        (s, _) => Path::new(s).to_path_buf(),
    }
}
