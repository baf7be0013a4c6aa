//! Track catalog: scanning one directory into an ordered, ordinal-indexed
//! list of playable tracks.

mod error;
mod model;
mod scan;

pub use error::ScanError;
pub use model::*;
pub use scan::{build_catalog, scan};
