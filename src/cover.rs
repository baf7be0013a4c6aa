//! Per-track cover art: request issuing, stale-reply filtering and decoding.

mod error;
mod extractor;
mod resolver;
mod service;
mod thumbnail;
mod types;

pub use error::ArtError;
pub use extractor::{ArtExtractor, LoftyExtractor};
pub use resolver::{CoverArtResolver, ResolveOutcome};
pub use service::{ArtFetcher, ArtService};
pub use types::*;
