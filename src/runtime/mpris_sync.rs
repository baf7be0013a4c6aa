use std::path::PathBuf;

use crate::app::App;
use crate::audio::AudioSink;
use crate::cover::ArtFetcher;
use crate::mpris::MprisHandle;
use crate::playback::PlayerState;

/// What was last published, so the bus only hears about changes.
#[derive(Debug, Default)]
pub struct MprisSync {
    last_track: Option<(usize, PathBuf)>,
    last_playback: PlayerState,
}

impl MprisSync {
    pub fn update<S: AudioSink, F: ArtFetcher>(&mut self, mpris: &MprisHandle, app: &App<S, F>) {
        let index = app.playlist().current_index();
        let track = app.playlist().current();
        let key = index.zip(track.map(|t| t.path.clone()));

        if key != self.last_track {
            mpris.set_track_metadata(index, track);
            self.last_track = key;
        }

        let playback = app.player_state();
        if playback != self.last_playback {
            mpris.set_playback(playback);
            self.last_playback = playback;
        }
    }
}
