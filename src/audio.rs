//! Audio output: a rodio-backed sink driven from its own thread.

mod error;
mod player;
mod sink;
mod thread;
mod types;

pub use error::AudioError;
pub use player::RodioSink;
pub use types::{AudioSink, BindingId, SinkEvent, SinkEventKind};
