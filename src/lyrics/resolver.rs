//! Match resolver - turns one track into validated lyrics
//!
//! For each track:
//! 1. Build a search query from the cleaned title and the main artist
//! 2. Search the remote catalog (once, never retried)
//! 3. Walk the first candidates until one passes validation and formatting
//!
//! Remote failures never escape: they are logged and the track ends the
//! pass as not found. A token rejected by the service also ends the track as
//! not found, and is handed back so the caller stops the run.

use super::artists::clean_title_for_search;
use super::domain::LyricsError;
use super::traits::LyricsProvider;
use super::{formatter, validator};
use crate::model::TrackRecord;

/// Number of candidates tried per track before giving up.
pub const MAX_SEARCH_INDEX: usize = 5;

/// Outcome of resolving one track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Formatted lyrics, also stored as the track's candidate
    Found(String),
    NotFound,
    /// Not found, and no further track can be searched
    Aborted(LyricsError),
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Orchestrates search, validation and formatting for single tracks.
pub struct MatchResolver<P> {
    provider: P,
    max_candidates: usize,
}

impl<P: LyricsProvider> MatchResolver<P> {
    /// Create a resolver trying up to [`MAX_SEARCH_INDEX`] candidates.
    pub fn new(provider: P) -> Self {
        Self::with_max_candidates(provider, MAX_SEARCH_INDEX)
    }

    /// Create a resolver with a custom candidate bound (at least one).
    pub fn with_max_candidates(provider: P, max_candidates: usize) -> Self {
        Self {
            provider,
            max_candidates: max_candidates.max(1),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn max_candidates(&self) -> usize {
        self.max_candidates
    }

    /// Build the search query for a track, `None` when it lacks a title or artist.
    pub fn query_for(track: &TrackRecord) -> Option<String> {
        let title = clean_title_for_search(&track.title);
        if title.is_empty() || track.main_artist.is_empty() {
            return None;
        }
        Some(format!("{} {}", title, track.main_artist))
    }

    /// Resolve a track, updating its candidate lyrics and state.
    pub async fn resolve(&self, track: &mut TrackRecord) -> Resolution {
        match self.find_lyrics(track).await {
            Ok(lyrics) => {
                tracing::info!(
                    target: "lyrics::resolver",
                    file = %track.filename(),
                    lines = lyrics.lines().count(),
                    "Lyrics found"
                );
                track.set_lyrics_found(lyrics.clone());
                Resolution::Found(lyrics)
            }
            Err(e) if e.is_fatal() => {
                tracing::error!(target: "lyrics::resolver", file = %track.filename(), error = %e, "Lyrics service refused the request");
                track.set_lyrics_not_found();
                Resolution::Aborted(e)
            }
            Err(e) => {
                if e.is_remote_failure() {
                    tracing::error!(target: "lyrics::resolver", file = %track.filename(), error = %e, "Lyrics lookup failed");
                } else {
                    tracing::info!(target: "lyrics::resolver", file = %track.filename(), reason = %e, "No lyrics");
                }
                track.set_lyrics_not_found();
                Resolution::NotFound
            }
        }
    }

    async fn find_lyrics(&self, track: &TrackRecord) -> Result<String, LyricsError> {
        let Some(query) = Self::query_for(track) else {
            tracing::debug!(target: "lyrics::resolver", file = %track.filename(), "Missing title or artist, not searching");
            return Err(LyricsError::NoCandidateFound);
        };

        tracing::debug!(target: "lyrics::resolver", query = %query, "Searching");
        let candidates = self.provider.search(&query).await?;

        for candidate in candidates.into_iter().take(self.max_candidates) {
            let lyrics = self.provider.fetch_lyrics(candidate.id).await?;

            if let Err(discard) = validator::inspect(&track.title, &lyrics) {
                tracing::debug!(target: "lyrics::resolver", song_id = candidate.id, "{}", discard);
                continue;
            }

            match formatter::format(&track.title, &lyrics.lines) {
                Ok(text) if !text.is_empty() => return Ok(text),
                Ok(_) => {
                    tracing::debug!(target: "lyrics::resolver", song_id = candidate.id, "Candidate has empty lyrics");
                }
                Err(discard) => {
                    tracing::debug!(target: "lyrics::resolver", song_id = candidate.id, "{}", discard);
                }
            }
        }

        Err(LyricsError::NoCandidateFound)
    }
}
