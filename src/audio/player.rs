use std::sync::Mutex;
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::warn;
use url::Url;

use crate::config::AudioSettings;
use crate::session::Volume;

use super::error::AudioError;
use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, AudioSink, BindingId, SinkEvent};

/// [`AudioSink`] backed by a dedicated rodio thread.
pub struct RodioSink {
    tx: Sender<AudioCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl RodioSink {
    /// Start the audio thread and wait until it has opened the output device.
    pub fn spawn(audio_settings: AudioSettings, events: Sender<SinkEvent>) -> Result<Self, AudioError> {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);

        let audio_handle = spawn_audio_thread(rx, events, audio_settings, ready_tx);

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = audio_handle.join();
                return Err(e);
            }
            Err(_) => {
                let _ = audio_handle.join();
                return Err(AudioError::NoOutputDevice(
                    "audio thread exited during startup".to_string(),
                ));
            }
        }

        Ok(Self {
            tx,
            join: Mutex::new(Some(audio_handle)),
        })
    }

    fn send(&self, cmd: AudioCmd) {
        if self.tx.send(cmd).is_err() {
            warn!("audio thread is gone; command dropped");
        }
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl AudioSink for RodioSink {
    fn load(&mut self, binding: BindingId, url: &Url, duration_hint: f64) {
        self.send(AudioCmd::Load {
            binding,
            url: url.clone(),
            duration_hint,
        });
    }

    fn unload(&mut self) {
        self.send(AudioCmd::Unload);
    }

    fn play(&mut self) {
        self.send(AudioCmd::Play);
    }

    fn pause(&mut self) {
        self.send(AudioCmd::Pause);
    }

    fn seek(&mut self, position_secs: f64) {
        if !position_secs.is_finite() {
            return;
        }
        self.send(AudioCmd::Seek(Duration::from_secs_f64(position_secs.max(0.0))));
    }

    fn set_volume(&mut self, volume: Volume) {
        self.send(AudioCmd::SetVolume(volume));
    }
}
