use std::io;
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    NoOutputDevice(String),

    #[error("not a local file: {0}")]
    NotAFile(Url),

    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },
}
