use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, SyncSender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use crate::config::AudioSettings;
use crate::session::Volume;

use super::error::AudioError;
use super::sink::create_sink_at;
use super::types::{AudioCmd, BindingId, SinkEvent, SinkEventKind};

/// Playback position bookkeeping: time accumulated while paused plus the
/// running stretch since the last resume.
#[derive(Debug, Default, Clone, Copy)]
pub(super) struct PlayClock {
    accumulated: Duration,
    started_at: Option<Instant>,
}

impl PlayClock {
    pub(super) fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub(super) fn start(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub(super) fn stop(&mut self, now: Instant) {
        if let Some(st) = self.started_at.take() {
            self.accumulated += now.saturating_duration_since(st);
        }
    }

    pub(super) fn reset_to(&mut self, position: Duration, now: Instant, running: bool) {
        self.accumulated = position;
        self.started_at = running.then_some(now);
    }

    pub(super) fn elapsed(&self, now: Instant) -> Duration {
        self.accumulated
            + self
                .started_at
                .map_or(Duration::ZERO, |st| now.saturating_duration_since(st))
    }
}

struct Bound {
    binding: BindingId,
    path: PathBuf,
    sink: Sink,
    clock: PlayClock,
    ended: bool,
}

fn emit(events: &Sender<SinkEvent>, binding: BindingId, kind: SinkEventKind) {
    // The receiver only disappears during shutdown.
    let _ = events.send(SinkEvent { binding, kind });
}

fn fade_out_sink(sink: &Sink, from: Volume, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    let start = from.gain();
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(start * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<SinkEvent>,
    audio_settings: AudioSettings,
    ready: SyncSender<Result<(), AudioError>>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                let _ = ready.send(Err(AudioError::NoOutputDevice(e.to_string())));
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);
        let _ = ready.send(Ok(()));

        let tick = Duration::from_millis(audio_settings.tick_ms.max(1));
        let mut volume = Volume::DEFAULT;
        let mut bound: Option<Bound> = None;

        loop {
            match rx.recv_timeout(tick) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load {
                        binding,
                        url,
                        duration_hint,
                    } => {
                        if let Some(old) = bound.take() {
                            old.sink.stop();
                        }

                        let Ok(path) = url.to_file_path() else {
                            let reason = AudioError::NotAFile(url).to_string();
                            emit(&events, binding, SinkEventKind::LoadFailed(reason));
                            continue;
                        };

                        match create_sink_at(&stream, &path, Duration::ZERO, volume) {
                            Ok((sink, total)) => {
                                let duration_secs = total
                                    .map(|d| d.as_secs_f64())
                                    .filter(|d| *d > 0.0)
                                    .unwrap_or(duration_hint);
                                debug!(?binding, path = %path.display(), duration_secs, "track loaded");
                                bound = Some(Bound {
                                    binding,
                                    path,
                                    sink,
                                    clock: PlayClock::default(),
                                    ended: false,
                                });
                                emit(&events, binding, SinkEventKind::CanPlay { duration_secs });
                            }
                            Err(e) => {
                                warn!(?binding, "load failed: {e}");
                                emit(&events, binding, SinkEventKind::LoadFailed(e.to_string()));
                            }
                        }
                    }

                    AudioCmd::Unload => {
                        if let Some(old) = bound.take() {
                            old.sink.stop();
                        }
                    }

                    AudioCmd::Play => {
                        if let Some(b) = bound.as_mut() {
                            if !b.clock.is_running() && !b.ended {
                                b.sink.play();
                                b.clock.start(Instant::now());
                            }
                        }
                    }

                    AudioCmd::Pause => {
                        if let Some(b) = bound.as_mut() {
                            b.sink.pause();
                            b.clock.stop(Instant::now());
                        }
                    }

                    AudioCmd::Seek(target) => {
                        // Scrubbing: rebuild the current sink and skip into the file.
                        // This uses `Source::skip_duration` (works for common formats).
                        let Some(b) = bound.as_mut() else {
                            continue;
                        };

                        match create_sink_at(&stream, &b.path, target, volume) {
                            Ok((new_sink, _)) => {
                                let running = b.clock.is_running();
                                b.sink.stop();
                                if running {
                                    new_sink.play();
                                }
                                b.sink = new_sink;
                                b.clock.reset_to(target, Instant::now(), running);
                                b.ended = false;
                                emit(
                                    &events,
                                    b.binding,
                                    SinkEventKind::TimeUpdate {
                                        current_secs: target.as_secs_f64(),
                                    },
                                );
                            }
                            Err(e) => warn!(binding = ?b.binding, "seek failed: {e}"),
                        }
                    }

                    AudioCmd::SetVolume(v) => {
                        volume = v;
                        if let Some(b) = bound.as_ref() {
                            b.sink.set_volume(v.gain());
                            emit(&events, b.binding, SinkEventKind::VolumeChange(v));
                        }
                    }

                    AudioCmd::Quit { fade_out_ms } => {
                        if let Some(b) = bound.take() {
                            // Fade out gently before stopping.
                            if b.clock.is_running() {
                                fade_out_sink(&b.sink, volume, fade_out_ms);
                            }
                            b.sink.stop();
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    // periodic position report and end-of-track detection
                    if let Some(b) = bound.as_mut() {
                        if b.clock.is_running() {
                            let now = Instant::now();
                            if b.sink.empty() {
                                if !b.ended {
                                    b.ended = true;
                                    b.clock.stop(now);
                                    emit(&events, b.binding, SinkEventKind::Ended);
                                }
                            } else {
                                let current_secs = b.clock.elapsed(now).as_secs_f64();
                                emit(&events, b.binding, SinkEventKind::TimeUpdate { current_secs });
                            }
                        }
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
