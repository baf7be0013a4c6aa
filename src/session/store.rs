use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use toml::{Table, Value};
use tracing::{debug, warn};

use crate::config::{SessionSettings, default_state_dir};

use super::state::{SessionState, Volume};

const KEY_DIRECTORY: &str = "directory";
const KEY_INDEX: &str = "index";
const KEY_VOLUME: &str = "volume";

/// Durable home of the session triple.
///
/// Neither operation fails the caller: `load` degrades corrupt or missing
/// data to defaults, `save` is best-effort.
pub trait SessionStore {
    fn load(&self) -> SessionState;
    fn save(&self, state: &SessionState);
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session file I/O: {0}")]
    Io(#[from] io::Error),
    #[error("cannot encode session: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("cannot replace session file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Session kept as a small TOML table of string values:
///
/// ```toml
/// directory = "/home/me/Music/album"
/// index = "3"
/// volume = "50"
/// ```
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Option<Table> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no saved session");
                return None;
            }
            Err(e) => {
                warn!(path = %self.path.display(), "cannot read session, using defaults: {e}");
                return None;
            }
        };

        match toml::from_str::<Table>(&text) {
            Ok(table) => Some(table),
            Err(e) => {
                warn!(path = %self.path.display(), "corrupt session, using defaults: {e}");
                None
            }
        }
    }

    fn try_save(&self, state: &SessionState) -> Result<(), SessionError> {
        let Some(table) = encode(state) else {
            // No directory: leave nothing behind, not even a stale index.
            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            };
        };

        let text = toml::to_string(&table)?;
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;

        // Write-then-rename so a crash never leaves a half-written session.
        let mut tmp = NamedTempFile::new_in(&parent)?;
        tmp.write_all(text.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> SessionState {
        decode(self.read_table().as_ref())
    }

    fn save(&self, state: &SessionState) {
        match self.try_save(state) {
            Ok(()) => debug!(path = %self.path.display(), ?state, "session saved"),
            Err(e) => warn!(path = %self.path.display(), "session not saved: {e}"),
        }
    }
}

/// In-memory store holding the same encoded form the file store writes.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    table: std::cell::RefCell<Option<Table>>,
}

#[cfg(test)]
impl MemorySessionStore {
    pub fn with_raw(table: Table) -> Self {
        Self {
            table: std::cell::RefCell::new(Some(table)),
        }
    }

    pub fn raw(&self) -> Option<Table> {
        self.table.borrow().clone()
    }
}

#[cfg(test)]
impl SessionStore for MemorySessionStore {
    fn load(&self) -> SessionState {
        decode(self.table.borrow().as_ref())
    }

    fn save(&self, state: &SessionState) {
        *self.table.borrow_mut() = encode(state);
    }
}

/// Session file location: `session.path`, then `TAPEDECK_SESSION_PATH`, then
/// the XDG state directory.
pub fn resolve_session_path(settings: &SessionSettings) -> PathBuf {
    if let Some(p) = &settings.path {
        return p.clone();
    }
    if let Some(p) = std::env::var_os("TAPEDECK_SESSION_PATH") {
        return PathBuf::from(p);
    }
    default_state_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("session.toml")
}

/// Accept both `"3"` and `3`; anything else counts as missing.
fn raw_field(table: &Table, key: &str) -> Option<String> {
    match table.get(key)? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Integer(i) => Some(i.to_string()),
        _ => None,
    }
}

pub(super) fn decode(table: Option<&Table>) -> SessionState {
    let Some(table) = table else {
        return SessionState::default();
    };

    let directory = raw_field(table, KEY_DIRECTORY)
        .filter(|d| !d.is_empty())
        .map(PathBuf::from);

    let current_index = directory.as_ref().and_then(|_| {
        raw_field(table, KEY_INDEX)?
            .parse::<i64>()
            .ok()
            .and_then(|i| usize::try_from(i).ok())
    });

    let volume = raw_field(table, KEY_VOLUME)
        .and_then(|v| v.parse::<i64>().ok())
        .map(Volume::new)
        .unwrap_or_default();

    SessionState {
        directory,
        current_index,
        volume,
    }
}

pub(super) fn encode(state: &SessionState) -> Option<Table> {
    let directory = state.directory.as_ref()?;

    let mut table = Table::new();
    table.insert(
        KEY_DIRECTORY.to_string(),
        Value::String(directory.to_string_lossy().into_owned()),
    );
    if let Some(index) = state.current_index {
        table.insert(KEY_INDEX.to_string(), Value::String(index.to_string()));
    }
    table.insert(
        KEY_VOLUME.to_string(),
        Value::String(state.volume.percent().to_string()),
    );
    Some(table)
}
