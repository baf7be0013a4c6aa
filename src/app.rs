//! Application module: the player session orchestrator.
//!
//! `App` lives in `app::model` and ties the playlist, playback controller,
//! cover art and session together.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
