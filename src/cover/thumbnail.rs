use std::io::Cursor;

use image::ImageReader;

use super::error::ArtError;
use super::types::{CoverImage, ThumbnailSize};

/// Decode embedded picture bytes and shrink them to fit `size`.
///
/// The thumbnail keeps the aspect ratio and has `size.height * 2` pixel rows at
/// most, since the renderer packs two rows per terminal cell.
pub fn decode_cover(bytes: &[u8], size: ThumbnailSize) -> Result<CoverImage, ArtError> {
    if bytes.is_empty() {
        return Err(ArtError::Empty);
    }

    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let format = reader.format().ok_or(ArtError::UnknownFormat)?;
    let img = reader.decode()?;

    let thumb = img
        .thumbnail(size.width.max(1), size.height.max(1) * 2)
        .to_rgb8();

    Ok(CoverImage {
        format,
        width: img.width(),
        height: img.height(),
        thumb_width: thumb.width(),
        thumb_height: thumb.height(),
        pixels: thumb.pixels().map(|p| p.0).collect(),
    })
}
