use tracing::debug;

use crate::audio::{AudioSink, BindingId, SinkEvent, SinkEventKind};
use crate::library::Track;
use crate::session::Volume;

use super::types::{PlaybackRuntime, PlayerState, SeekTarget, SinkSignal};

/// Owns the audio sink and keeps it bound to the current track.
pub struct PlaybackController<S: AudioSink> {
    sink: S,
    state: PlayerState,
    runtime: PlaybackRuntime,
    binding: BindingId,
    /// The sink could not open the bound track; transport stays inert until
    /// the next bind.
    load_failed: bool,
}

impl<S: AudioSink> PlaybackController<S> {
    pub fn new(mut sink: S, volume: Volume) -> Self {
        sink.set_volume(volume);
        Self {
            sink,
            state: PlayerState::Idle,
            runtime: PlaybackRuntime {
                volume,
                paused: true,
                ..PlaybackRuntime::default()
            },
            binding: BindingId::default(),
            load_failed: false,
        }
    }

    /// Attach the sink to `track` and start playing it from 0; `None` detaches.
    ///
    /// Always opens a new binding, so events still in flight for the previous
    /// one are ignored.
    pub fn bind(&mut self, track: Option<&Track>) {
        self.binding = self.binding.next();
        self.runtime.current_time_secs = 0.0;
        self.load_failed = false;

        match track {
            Some(track) => {
                self.runtime.duration_secs = track.duration_secs;
                self.sink
                    .load(self.binding, &track.playable_url, track.duration_secs);
                self.sink.play();
                self.state = PlayerState::Playing;
                self.runtime.paused = false;
                debug!(binding = ?self.binding, track = %track.name, "bound");
            }
            None => {
                self.runtime.duration_secs = 0.0;
                self.sink.unload();
                self.state = PlayerState::Idle;
                self.runtime.paused = true;
                debug!(binding = ?self.binding, "unbound");
            }
        }
    }

    pub fn play(&mut self) {
        if self.load_failed {
            return;
        }
        match self.state {
            PlayerState::Idle | PlayerState::Playing => return,
            PlayerState::Ended => {
                // restart the same track
                self.sink.seek(0.0);
                self.runtime.current_time_secs = 0.0;
            }
            PlayerState::Paused => {}
        }
        self.sink.play();
        self.state = PlayerState::Playing;
        self.runtime.paused = false;
    }

    pub fn pause(&mut self) {
        if self.state == PlayerState::Playing {
            self.sink.pause();
            self.state = PlayerState::Paused;
            self.runtime.paused = true;
        }
    }

    pub fn toggle_play_pause(&mut self) {
        match self.state {
            PlayerState::Playing => self.pause(),
            PlayerState::Paused | PlayerState::Ended => self.play(),
            PlayerState::Idle => {}
        }
    }

    /// Move within the bound track, clamped to `[0, duration]`.
    /// Ignored while nothing is bound, the track failed to load or the duration
    /// is unknown.
    pub fn seek(&mut self, target: SeekTarget) {
        let duration = self.runtime.duration_secs;
        if self.state == PlayerState::Idle || self.load_failed || duration <= 0.0 {
            return;
        }

        let secs = match target {
            SeekTarget::Seconds(s) => s,
            SeekTarget::Fraction(f) => f * duration,
        };
        if !secs.is_finite() {
            return;
        }
        let secs = secs.clamp(0.0, duration);

        self.sink.seek(secs);
        self.runtime.current_time_secs = secs;
        if self.state == PlayerState::Ended {
            self.state = PlayerState::Paused;
        }
    }

    pub fn seek_by(&mut self, delta_secs: f64) {
        self.seek(SeekTarget::Seconds(self.runtime.current_time_secs + delta_secs));
    }

    /// Apply a new volume (clamped to `0..=100`) and return what was applied.
    pub fn set_volume(&mut self, percent: i64) -> Volume {
        let volume = Volume::new(percent);
        self.runtime.volume = volume;
        self.sink.set_volume(volume);
        volume
    }

    /// Fold a sink notification into the runtime state.
    pub fn on_sink_event(&mut self, event: SinkEvent) -> Option<SinkSignal> {
        if event.binding != self.binding || self.state == PlayerState::Idle {
            debug!(binding = ?event.binding, current = ?self.binding, "dropping event from a detached binding");
            return None;
        }

        match event.kind {
            SinkEventKind::CanPlay { duration_secs } => {
                if duration_secs > 0.0 {
                    self.runtime.duration_secs = duration_secs;
                }
                None
            }
            SinkEventKind::TimeUpdate { current_secs } => {
                let mut t = current_secs.max(0.0);
                if self.runtime.duration_secs > 0.0 {
                    t = t.min(self.runtime.duration_secs);
                }
                self.runtime.current_time_secs = t;
                None
            }
            SinkEventKind::VolumeChange(volume) => {
                self.runtime.volume = volume;
                None
            }
            SinkEventKind::Ended => {
                self.state = PlayerState::Ended;
                self.runtime.paused = true;
                Some(SinkSignal::TrackEnded)
            }
            SinkEventKind::LoadFailed(reason) => {
                self.load_failed = true;
                self.state = PlayerState::Paused;
                self.runtime.paused = true;
                Some(SinkSignal::LoadFailed(reason))
            }
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn runtime(&self) -> &PlaybackRuntime {
        &self.runtime
    }

    pub fn binding(&self) -> BindingId {
        self.binding
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
