//! Shared fakes for unit tests.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use url::Url;

use crate::audio::{AudioSink, BindingId};
use crate::cover::{ArtFetcher, ArtRequest, ArtTicket};
use crate::library::{Catalog, ScannedTrack};
use crate::session::Volume;

/// Catalog of `/music/<name>.mp3` tracks with the given durations.
pub fn catalog(specs: &[(&str, f64)]) -> Catalog {
    Catalog::from_scanned(
        specs
            .iter()
            .map(|(name, duration)| ScannedTrack {
                path: PathBuf::from(format!("/music/{name}.mp3")),
                name: name.to_string(),
                artist: "Tester".to_string(),
                duration_secs: *duration,
            })
            .collect(),
    )
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load { binding: BindingId, url: Url },
    Unload,
    Play,
    Pause,
    Seek(f64),
    SetVolume(Volume),
    RequestArt { ticket: ArtTicket, path: PathBuf },
}

/// Calls made on the fakes, in order, across sink and fetcher.
pub type Journal = Rc<RefCell<Vec<Call>>>;

#[derive(Debug, Default, Clone)]
pub struct FakeSink {
    pub journal: Journal,
}

impl FakeSink {
    pub fn calls(&self) -> Vec<Call> {
        self.journal.borrow().clone()
    }

    pub fn clear(&self) {
        self.journal.borrow_mut().clear();
    }

    fn push(&self, call: Call) {
        self.journal.borrow_mut().push(call);
    }
}

impl AudioSink for FakeSink {
    fn load(&mut self, binding: BindingId, url: &Url, _duration_hint: f64) {
        self.push(Call::Load {
            binding,
            url: url.clone(),
        });
    }

    fn unload(&mut self) {
        self.push(Call::Unload);
    }

    fn play(&mut self) {
        self.push(Call::Play);
    }

    fn pause(&mut self) {
        self.push(Call::Pause);
    }

    fn seek(&mut self, position_secs: f64) {
        self.push(Call::Seek(position_secs));
    }

    fn set_volume(&mut self, volume: Volume) {
        self.push(Call::SetVolume(volume));
    }
}

#[derive(Debug, Default, Clone)]
pub struct RecordingFetcher {
    pub journal: Journal,
}

impl RecordingFetcher {
    pub fn requests(&self) -> Vec<ArtRequest> {
        self.journal
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::RequestArt { ticket, path } => Some(ArtRequest {
                    ticket: *ticket,
                    path: path.clone(),
                }),
                _ => None,
            })
            .collect()
    }
}

impl ArtFetcher for RecordingFetcher {
    fn request(&self, request: ArtRequest) {
        self.journal.borrow_mut().push(Call::RequestArt {
            ticket: request.ticket,
            path: request.path,
        });
    }
}

/// A sink and a fetcher writing into one journal.
pub fn fakes() -> (FakeSink, RecordingFetcher, Journal) {
    let journal = Journal::default();
    (
        FakeSink {
            journal: journal.clone(),
        },
        RecordingFetcher {
            journal: journal.clone(),
        },
        journal,
    )
}
