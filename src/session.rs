//! Persisted session: the directory being played, the current track index
//! and the volume, restored at startup and written back on exit.

mod state;
mod store;

pub use state::{SessionState, Volume};
#[cfg(test)]
pub use store::MemorySessionStore;
pub use store::{FileSessionStore, SessionError, SessionStore, resolve_session_path};
