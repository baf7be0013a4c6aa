use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtError {
    #[error("no picture data")]
    Empty,

    #[error("unrecognized image format")]
    UnknownFormat,

    #[error("picture is {size} bytes, limit is {max}")]
    TooLarge { size: usize, max: usize },

    #[error("failed to read tags: {0}")]
    Tags(#[from] lofty::error::LoftyError),

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] io::Error),
}
