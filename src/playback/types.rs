use crate::session::Volume;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlayerState {
    /// Nothing bound.
    #[default]
    Idle,
    Paused,
    Playing,
    /// The bound track ran out.
    Ended,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SeekTarget {
    Seconds(f64),
    /// Share of the duration, `0.0..=1.0`.
    Fraction(f64),
}

/// What the controller believes the sink is doing.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct PlaybackRuntime {
    pub current_time_secs: f64,
    /// `0.0` while unknown.
    pub duration_secs: f64,
    pub volume: Volume,
    pub paused: bool,
}

impl PlaybackRuntime {
    /// Progress in `0.0..=1.0`; `0.0` while the duration is unknown.
    pub fn progress(&self) -> f64 {
        if self.duration_secs > 0.0 {
            (self.current_time_secs / self.duration_secs).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Sink outcomes the orchestrator has to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkSignal {
    TrackEnded,
    LoadFailed(String),
}
