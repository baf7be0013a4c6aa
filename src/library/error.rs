use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a directory could not be turned into a catalog.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("cannot read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
