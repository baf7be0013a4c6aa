use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tracing::{debug, warn};

use super::extractor::ArtExtractor;
use super::thumbnail::decode_cover;
use super::types::{ArtReply, ArtRequest, CoverArt, ThumbnailSize};

/// Fire-and-forget art lookups. Replies arrive later on a separate channel.
pub trait ArtFetcher {
    fn request(&self, request: ArtRequest);
}

/// Worker thread answering [`ArtRequest`]s with decoded [`ArtReply`]s.
///
/// Only the newest queued request is served; the resolver discards replies
/// that are no longer wanted anyway.
pub struct ArtService {
    tx: Sender<ArtRequest>,
}

impl ArtService {
    pub fn spawn<E: ArtExtractor>(
        extractor: E,
        size: ThumbnailSize,
        replies: Sender<ArtReply>,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<ArtRequest>();

        thread::spawn(move || {
            while let Ok(first) = rx.recv() {
                let ArtRequest { ticket, path } = newest_request(first, &rx);
                let bytes = extractor.extract(&path);
                let art = match decode_cover(&bytes, size) {
                    Ok(image) => CoverArt::Image(image),
                    Err(e) => {
                        debug!(path = %path.display(), "cover art unavailable: {e}");
                        CoverArt::Placeholder
                    }
                };
                debug!(?ticket, path = %path.display(), len = bytes.len(), "art extracted");
                if replies.send(ArtReply { ticket, art }).is_err() {
                    break;
                }
            }
        });

        Self { tx }
    }
}

/// Skip ahead to the latest queued request.
pub(super) fn newest_request(first: ArtRequest, rx: &Receiver<ArtRequest>) -> ArtRequest {
    let mut latest = first;
    while let Ok(next) = rx.try_recv() {
        debug!(ticket = ?latest.ticket, "skipping superseded art request");
        latest = next;
    }
    latest
}

impl ArtFetcher for ArtService {
    fn request(&self, request: ArtRequest) {
        if self.tx.send(request).is_err() {
            warn!("art worker is gone; request dropped");
        }
    }
}
