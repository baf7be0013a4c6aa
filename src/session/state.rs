use std::fmt;
use std::path::PathBuf;

/// Playback volume in percent. Always within `0..=100`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Volume(u8);

impl Volume {
    pub const MAX: u8 = 100;
    pub const DEFAULT: Volume = Volume(50);

    /// Clamp any integer into range; out-of-range input is never rejected.
    pub fn new(percent: i64) -> Self {
        Self(percent.clamp(0, Self::MAX as i64) as u8)
    }

    pub fn percent(self) -> u8 {
        self.0
    }

    /// Linear gain for the audio backend (`0.0..=1.0`).
    pub fn gain(self) -> f32 {
        self.0 as f32 / Self::MAX as f32
    }

    pub fn offset(self, delta: i64) -> Self {
        Self::new(self.0 as i64 + delta)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// What survives a restart.
///
/// `current_index` is only meaningful together with `directory`; a stored
/// index is validated against the catalog it is applied to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub directory: Option<PathBuf>,
    pub current_index: Option<usize>,
    pub volume: Volume,
}

impl SessionState {
    /// The stored index if it addresses a track of a catalog with `len` entries.
    pub fn index_within(&self, len: usize) -> Option<usize> {
        self.current_index.filter(|&i| i < len)
    }
}
