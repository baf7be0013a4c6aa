use std::fs;
use std::path::Path;

use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::error::ScanError;
use super::model::{Catalog, ScannedTrack, UNKNOWN_ARTIST};

/// Configured extensions, lowercased and without a leading dot.
fn audio_extensions(settings: &LibrarySettings) -> Vec<String> {
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

fn is_audio_file(path: &Path, exts: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| exts.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Read the artist tag and duration; files lofty cannot parse still play,
/// they just show up as "Unknown Artist" with an unknown (0) duration.
fn probe(path: &Path) -> (String, f64) {
    let Ok(tagged) = lofty::read_from_path(path) else {
        debug!(path = %path.display(), "no readable tags");
        return (UNKNOWN_ARTIST.to_string(), 0.0);
    };

    let duration = tagged.properties().duration().as_secs_f64();
    let artist = tagged
        .primary_tag()
        .or_else(|| tagged.first_tag())
        .and_then(|tag| tag.artist().map(|a| a.trim().to_string()))
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());

    (artist, duration)
}

/// List the audio files of `dir`, sorted by path.
///
/// Fails only when `dir` itself is missing, not a directory or unreadable;
/// unreadable entries below it are skipped.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Result<Vec<ScannedTrack>, ScanError> {
    let meta = fs::metadata(dir).map_err(|source| ScanError::Unreadable {
        path: dir.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(ScanError::NotADirectory(dir.to_path_buf()));
    }
    fs::read_dir(dir).map_err(|source| ScanError::Unreadable {
        path: dir.to_path_buf(),
        source,
    })?;

    let exts = audio_extensions(settings);
    let mut tracks: Vec<ScannedTrack> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if path.is_file() && is_audio_file(path, &exts) {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("UNKNOWN")
                .to_string();
            let (artist, duration_secs) = probe(path);

            tracks.push(ScannedTrack {
                path: path.to_path_buf(),
                name,
                artist,
                duration_secs,
            });
        }
    }

    tracks.sort_by(|a, b| a.path.cmp(&b.path));
    info!(dir = %dir.display(), count = tracks.len(), "directory scanned");
    Ok(tracks)
}

/// Scan `dir` and number the result into a fresh catalog.
pub fn build_catalog(dir: &Path, settings: &LibrarySettings) -> Result<Catalog, ScanError> {
    Ok(Catalog::from_scanned(scan(dir, settings)?))
}
