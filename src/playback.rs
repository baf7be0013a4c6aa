//! Playback control: binds the current track to the audio sink and tracks
//! what the sink reports back.

mod controller;
mod types;

pub use controller::PlaybackController;
pub use types::{PlaybackRuntime, PlayerState, SeekTarget, SinkSignal};
