//! Test utilities and fixtures for lyrics-tagger tests.
//!
//! This module provides track factories and an in-memory [`TagStore`] to
//! reduce boilerplate in tests.
//!
//! # Example
//!
//! ```ignore
//! use lyrics_tagger::test_utils::{mock_track, MockTagStore};
//!
//! let store = MockTagStore::default().with_file("/music/a.mp3", mock_tags("A", "B"));
//! let track = mock_track("Song", "Artist");
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::metadata::{FileKind, TagStore, TrackTags};
use crate::model::TrackRecord;

/// Creates tags with the given title and raw artist field.
///
/// Customize the rest with struct update syntax:
///
/// ```ignore
/// let tags = TrackTags {
///     lyrics: Some("already here".to_string()),
///     ..mock_tags("Song", "Artist")
/// };
/// ```
pub fn mock_tags(title: &str, artist: &str) -> TrackTags {
    TrackTags {
        title: title.to_string(),
        artist: artist.to_string(),
        album: "Test Album".to_string(),
        duration_seconds: 180,
        lyrics: None,
        cover: None,
    }
}

/// Creates a freshly read MP3 track at `/music/{title}.mp3`.
pub fn mock_track(title: &str, artist: &str) -> TrackRecord {
    TrackRecord::from_tags(
        format!("/music/{}.mp3", title),
        FileKind::Mp3,
        mock_tags(title, artist),
    )
}

/// Creates a track that already stores lyrics in its file.
pub fn mock_track_with_lyrics(title: &str, artist: &str, lyrics: &str) -> TrackRecord {
    TrackRecord::from_tags(
        format!("/music/{}.mp3", title),
        FileKind::Mp3,
        TrackTags {
            lyrics: Some(lyrics.to_string()),
            ..mock_tags(title, artist)
        },
    )
}

/// In-memory tag store.
///
/// Reads return the registered tags (unknown paths fail with `NotFound`),
/// writes are recorded and fail for paths marked read-only.
#[derive(Default)]
pub struct MockTagStore {
    files: HashMap<PathBuf, TrackTags>,
    read_only: HashSet<PathBuf>,
    writes: Mutex<Vec<(PathBuf, String)>>,
}

impl MockTagStore {
    /// Register a readable file.
    pub fn with_file(mut self, path: impl Into<PathBuf>, tags: TrackTags) -> Self {
        self.files.insert(path.into(), tags);
        self
    }

    /// Make writes to `path` fail.
    pub fn with_read_only(mut self, path: impl Into<PathBuf>) -> Self {
        self.read_only.insert(path.into());
        self
    }

    /// Writes received, in order.
    pub fn writes(&self) -> Vec<(PathBuf, String)> {
        self.writes.lock().unwrap().clone()
    }
}

impl TagStore for MockTagStore {
    fn read_tags(&self, path: &Path, _kind: FileKind) -> Result<TrackTags> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| Error::not_found(path))
    }

    fn write_lyrics(&self, path: &Path, _kind: FileKind, lyrics: &str) -> Result<()> {
        if self.read_only.contains(path) {
            return Err(Error::metadata(path, "permission denied"));
        }
        self.writes
            .lock()
            .unwrap()
            .push((path.to_path_buf(), lyrics.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_track_defaults() {
        let track = mock_track("Song", "Artist");
        assert_eq!(track.title, "Song");
        assert_eq!(track.main_artist, "Artist");
        assert_eq!(track.filepath(), Path::new("/music/Song.mp3"));
        assert!(!track.has_lyrics_original());
    }

    #[test]
    fn test_mock_track_with_lyrics() {
        let track = mock_track_with_lyrics("Song", "Artist", "la la");
        assert_eq!(track.lyrics_original, "la la");
    }

    #[test]
    fn test_mock_store_reads_and_writes() {
        let store = MockTagStore::default()
            .with_file("/music/a.mp3", mock_tags("A", "B"))
            .with_read_only("/music/locked.mp3");

        let tags = store.read_tags(Path::new("/music/a.mp3"), FileKind::Mp3).unwrap();
        assert_eq!(tags.title, "A");
        assert!(store.read_tags(Path::new("/music/missing.mp3"), FileKind::Mp3).is_err());

        store.write_lyrics(Path::new("/music/a.mp3"), FileKind::Mp3, "x").unwrap();
        assert!(store.write_lyrics(Path::new("/music/locked.mp3"), FileKind::Mp3, "x").is_err());
        assert_eq!(store.writes().len(), 1);
    }
}
