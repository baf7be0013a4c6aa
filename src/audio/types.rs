//! Audio-related small types.
//!
//! This module defines the sink seam used by the playback controller, the
//! events a sink reports back, and the commands understood by the audio thread.

use std::time::Duration;

use url::Url;

use crate::session::Volume;

/// Identity of one attachment of the sink to one track.
///
/// Every (re)bind gets a fresh id; events carrying an older id belong to a
/// detached binding and are ignored.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BindingId(pub u64);

impl BindingId {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SinkEventKind {
    /// The source is decoded and ready; `duration_secs` is `0.0` when unknown.
    CanPlay { duration_secs: f64 },
    /// Periodic position report while playing, and after every seek.
    TimeUpdate { current_secs: f64 },
    /// The sink applied a new volume.
    VolumeChange(Volume),
    /// The source ran out naturally.
    Ended,
    /// The URL could not be opened or decoded.
    LoadFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SinkEvent {
    pub binding: BindingId,
    pub kind: SinkEventKind,
}

/// An exclusively owned audio output bound to at most one track at a time.
///
/// Calls never block on the device; outcomes arrive later as [`SinkEvent`]s.
pub trait AudioSink {
    /// Detach whatever was bound and attach `url`, paused at position 0.
    /// `duration_hint` is reported when the decoder cannot tell the length.
    fn load(&mut self, binding: BindingId, url: &Url, duration_hint: f64);
    fn unload(&mut self);
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, position_secs: f64);
    fn set_volume(&mut self, volume: Volume);
}

#[derive(Debug)]
pub(super) enum AudioCmd {
    Load {
        binding: BindingId,
        url: Url,
        duration_hint: f64,
    },
    Unload,
    Play,
    Pause,
    Seek(Duration),
    SetVolume(Volume),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}
