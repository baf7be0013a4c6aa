use std::path::{Path, PathBuf};

use tracing::debug;

use crate::library::Track;

use super::types::{ArtReply, ArtRequest, ArtTicket, CoverArt, CoverArtResult};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    Applied,
    /// Reply to a request that is no longer the current one.
    Stale,
    /// Second reply to the current request.
    Duplicate,
}

#[derive(Debug)]
struct Outstanding {
    ticket: ArtTicket,
    path: PathBuf,
    answered: bool,
}

/// Tracks the one art request that matters (the current track's) and what is
/// on screen.
#[derive(Debug, Default)]
pub struct CoverArtResolver {
    last_ticket: ArtTicket,
    outstanding: Option<Outstanding>,
    shown: CoverArtResult,
}

impl CoverArtResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current track changed: show the placeholder and ask for its art.
    pub fn begin(&mut self, track: Option<&Track>) -> Option<ArtRequest> {
        self.shown = CoverArtResult {
            track_path: track.map(|t| t.path.clone()),
            art: CoverArt::Placeholder,
        };

        let Some(track) = track else {
            self.outstanding = None;
            return None;
        };

        self.last_ticket = self.last_ticket.next();
        self.outstanding = Some(Outstanding {
            ticket: self.last_ticket,
            path: track.path.clone(),
            answered: false,
        });
        Some(ArtRequest {
            ticket: self.last_ticket,
            path: track.path.clone(),
        })
    }

    /// Apply `reply` if it answers the request for `current_path`.
    pub fn resolve(&mut self, reply: ArtReply, current_path: Option<&Path>) -> ResolveOutcome {
        let Some(outstanding) = self.outstanding.as_mut() else {
            return ResolveOutcome::Stale;
        };
        if reply.ticket != outstanding.ticket || current_path != Some(outstanding.path.as_path()) {
            debug!(ticket = ?reply.ticket, current = ?outstanding.ticket, "stale art reply");
            return ResolveOutcome::Stale;
        }
        if outstanding.answered {
            return ResolveOutcome::Duplicate;
        }
        outstanding.answered = true;
        self.shown.art = reply.art;
        ResolveOutcome::Applied
    }

    pub fn shown(&self) -> &CoverArtResult {
        &self.shown
    }
}
