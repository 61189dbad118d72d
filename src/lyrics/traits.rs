//! Trait definition for the remote lyrics catalog.
//!
//! The resolver only talks to the service through [`LyricsProvider`], so
//! tests substitute the mock implementations below for the real client.

use async_trait::async_trait;

use super::domain::{CandidateRef, LyricsError, SongLyrics};

/// Remote catalog able to search songs and return their lyrics.
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    /// Search the catalog, best match first.
    async fn search(&self, query: &str) -> Result<Vec<CandidateRef>, LyricsError>;

    /// Fetch the raw lyrics of a song.
    async fn fetch_lyrics(&self, song_id: u64) -> Result<SongLyrics, LyricsError>;
}

#[async_trait]
impl LyricsProvider for super::genius::GeniusClient {
    async fn search(&self, query: &str) -> Result<Vec<CandidateRef>, LyricsError> {
        self.search(query).await
    }

    async fn fetch_lyrics(&self, song_id: u64) -> Result<SongLyrics, LyricsError> {
        self.fetch_lyrics(song_id).await
    }
}

#[async_trait]
impl<P: LyricsProvider + ?Sized> LyricsProvider for std::sync::Arc<P> {
    async fn search(&self, query: &str) -> Result<Vec<CandidateRef>, LyricsError> {
        (**self).search(query).await
    }

    async fn fetch_lyrics(&self, song_id: u64) -> Result<SongLyrics, LyricsError> {
        (**self).fetch_lyrics(song_id).await
    }
}
