use std::path::{Path, PathBuf};

use tracing::warn;
use url::Url;

/// Artist shown when a file carries no (usable) artist tag.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// One audio file as reported by the directory scanner, before it is placed
/// in a catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedTrack {
    pub path: PathBuf,
    pub name: String,
    pub artist: String,
    /// Seconds; `0.0` when the duration could not be probed.
    pub duration_secs: f64,
}

/// Immutable descriptor of one playable file within a catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub path: PathBuf,
    pub name: String,
    pub artist: String,
    pub duration_secs: f64,
    pub playable_url: Url,
    /// Position in the owning catalog. Meaningless once that catalog is replaced.
    pub ordinal: usize,
}

/// Ordered tracks from one directory scan. Replaced wholesale on re-scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    /// Build a catalog keeping the scanner's order; ordinals are assigned
    /// densely from 0. Entries whose path cannot be turned into a playable URL
    /// are dropped.
    pub fn from_scanned(entries: Vec<ScannedTrack>) -> Self {
        let tracks = entries
            .into_iter()
            .filter_map(|entry| match playable_url(&entry.path) {
                Some(url) => Some((entry, url)),
                None => {
                    warn!(path = %entry.path.display(), "skipping track without a playable url");
                    None
                }
            })
            .enumerate()
            .map(|(ordinal, (entry, playable_url))| Track {
                path: entry.path,
                name: entry.name,
                artist: entry.artist,
                duration_secs: entry.duration_secs.max(0.0),
                playable_url,
                ordinal,
            })
            .collect();

        Self { tracks }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }
}

/// Map a filesystem path to the `file://` URL the audio sink loads.
///
/// Relative paths are resolved against the current directory first.
pub fn playable_url(path: &Path) -> Option<Url> {
    let absolute = std::path::absolute(path).ok()?;
    Url::from_file_path(absolute).ok()
}
