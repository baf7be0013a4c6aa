use std::path::PathBuf;

use image::ImageFormat;

use crate::config::CoverSettings;

/// Identity of one art request; the resolver only accepts the reply to the
/// latest one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ArtTicket(pub u64);

impl ArtTicket {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtRequest {
    pub ticket: ArtTicket,
    pub path: PathBuf,
}

/// Decoded art for one request; the placeholder when the file has no usable
/// picture.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtReply {
    pub ticket: ArtTicket,
    pub art: CoverArt,
}

/// Thumbnail box in terminal cells. Each cell shows two pixel rows.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ThumbnailSize {
    pub width: u32,
    pub height: u32,
}

impl ThumbnailSize {
    pub fn from_settings(settings: &CoverSettings) -> Self {
        Self {
            width: settings.thumbnail_width.max(1),
            height: settings.thumbnail_height.max(1),
        }
    }
}

impl Default for ThumbnailSize {
    fn default() -> Self {
        Self::from_settings(&CoverSettings::default())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoverImage {
    pub format: ImageFormat,
    /// Dimensions of the embedded picture.
    pub width: u32,
    pub height: u32,
    /// Dimensions of `pixels`, in pixels.
    pub thumb_width: u32,
    pub thumb_height: u32,
    /// Row-major RGB thumbnail.
    pub pixels: Vec<[u8; 3]>,
}

impl CoverImage {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.thumb_width || y >= self.thumb_height {
            return None;
        }
        self.pixels
            .get((y as usize) * (self.thumb_width as usize) + x as usize)
            .copied()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CoverArt {
    #[default]
    Placeholder,
    Image(CoverImage),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoverArtResult {
    pub track_path: Option<PathBuf>,
    pub art: CoverArt,
}
