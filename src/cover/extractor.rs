use std::path::Path;

use lofty::picture::PictureType;
use lofty::prelude::TaggedFileExt;
use tracing::debug;

use super::error::ArtError;

/// Source of embedded cover art. Runs on the art worker thread.
pub trait ArtExtractor: Send + 'static {
    /// Raw picture bytes for `path`; empty when there is nothing to show.
    fn extract(&self, path: &Path) -> Vec<u8>;
}

/// Reads embedded pictures from audio tags.
#[derive(Debug, Clone)]
pub struct LoftyExtractor {
    max_bytes: usize,
}

impl LoftyExtractor {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    /// Front cover if tagged as such, otherwise the first picture.
    pub fn read_picture(&self, path: &Path) -> Result<Option<Vec<u8>>, ArtError> {
        let tagged = lofty::read_from_path(path)?;

        let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
            return Ok(None);
        };

        let pictures = tag.pictures();
        let Some(picture) = pictures
            .iter()
            .find(|p| p.pic_type() == PictureType::CoverFront)
            .or_else(|| pictures.first())
        else {
            return Ok(None);
        };

        let data = picture.data();
        if data.len() > self.max_bytes {
            return Err(ArtError::TooLarge {
                size: data.len(),
                max: self.max_bytes,
            });
        }
        Ok(Some(data.to_vec()))
    }
}

impl ArtExtractor for LoftyExtractor {
    fn extract(&self, path: &Path) -> Vec<u8> {
        match self.read_picture(path) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => Vec::new(),
            Err(e) => {
                debug!(path = %path.display(), "no cover art: {e}");
                Vec::new()
            }
        }
    }
}
