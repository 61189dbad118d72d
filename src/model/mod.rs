//! Core data model: one audio file and its lyrics-acquisition state.
//!
//! A [`TrackRecord`] is created once its tags have been read and lives in the
//! working set until the user removes it. Nothing is persisted across runs.
//!
//! # State machine
//!
//! ```text
//! TagsRead ──search──> LyricsFound | LyricsNotFound
//! LyricsFound | LyricsNotSaved ──save──> LyricsSaved | LyricsNotSaved
//! any state with a candidate ──discard──> TagsRead
//! ```
//!
//! No state is terminal: a saved or failed track can be searched again.

use std::path::{Path, PathBuf};

use crate::lyrics::artists;
use crate::metadata::{FileKind, TrackTags};

/// Lifecycle state of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackState {
    TagsRead,
    LyricsFound,
    LyricsNotFound,
    LyricsSaved,
    LyricsNotSaved,
}

impl TrackState {
    /// Human readable description, as shown in the track list.
    pub fn description(self) -> &'static str {
        match self {
            Self::TagsRead => "Tags read",
            Self::LyricsFound => "Lyrics found",
            Self::LyricsNotFound => "Couldn't find lyrics",
            Self::LyricsSaved => "Lyrics saved",
            Self::LyricsNotSaved => "Couldn't save the lyrics",
        }
    }

    /// Whether `self -> next` is an edge of the state machine.
    pub fn can_transition_to(self, next: TrackState) -> bool {
        use TrackState::*;
        match next {
            // A search may start from any state
            LyricsFound | LyricsNotFound => true,
            LyricsSaved | LyricsNotSaved => matches!(self, LyricsFound | LyricsNotSaved),
            TagsRead => matches!(self, LyricsFound | LyricsNotSaved),
        }
    }
}

impl std::fmt::Display for TrackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// Outcome of a save attempt on one track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The candidate was written and cleared
    Saved,
    /// Writing failed; the candidate is kept for a retry
    Failed(String),
    /// No candidate to write; state unchanged
    NothingToSave,
}

/// One audio file in the working set.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackRecord {
    filepath: PathBuf,
    filename: String,
    kind: FileKind,
    /// Title from the file tags
    pub title: String,
    /// Artists from the file tags, in order of appearance
    pub artists: Vec<String>,
    /// First artist, or empty
    pub main_artist: String,
    pub album: String,
    pub duration_seconds: u64,
    pub cover: Option<Vec<u8>>,
    /// Lyrics already stored in the file
    pub lyrics_original: String,
    lyrics_new: String,
    state: TrackState,
}

impl TrackRecord {
    /// Build a record from freshly read tags.
    pub fn from_tags(path: impl Into<PathBuf>, kind: FileKind, tags: TrackTags) -> Self {
        let filepath = path.into();
        let filename = filepath
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let artists = artists::split_artists(&tags.artist);
        let main_artist = artists::main_artist(&artists);

        Self {
            filepath,
            filename,
            kind,
            title: tags.title,
            artists,
            main_artist,
            album: tags.album,
            duration_seconds: tags.duration_seconds,
            cover: tags.cover,
            lyrics_original: tags.lyrics.unwrap_or_default(),
            lyrics_new: String::new(),
            state: TrackState::TagsRead,
        }
    }

    pub fn filepath(&self) -> &Path {
        &self.filepath
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn state(&self) -> TrackState {
        self.state
    }

    /// Candidate lyrics; empty when there is none.
    pub fn lyrics_new(&self) -> &str {
        &self.lyrics_new
    }

    pub fn has_lyrics_original(&self) -> bool {
        !self.lyrics_original.is_empty()
    }

    pub fn has_lyrics_new(&self) -> bool {
        !self.lyrics_new.is_empty()
    }

    /// Record lyrics produced by a search; replaces any previous candidate.
    pub fn set_lyrics_found(&mut self, lyrics: String) {
        self.lyrics_new = lyrics;
        self.transition(TrackState::LyricsFound);
    }

    /// Record a search that produced nothing.
    pub fn set_lyrics_not_found(&mut self) {
        self.transition(TrackState::LyricsNotFound);
    }

    /// Apply the result of writing the candidate to the file.
    ///
    /// Without a candidate this is a no-op and returns `NothingToSave`.
    pub fn apply_save_result<E: std::fmt::Display>(&mut self, result: Result<(), E>) -> SaveOutcome {
        if !self.has_lyrics_new() {
            return SaveOutcome::NothingToSave;
        }
        match result {
            Ok(()) => {
                self.lyrics_new.clear();
                self.transition(TrackState::LyricsSaved);
                SaveOutcome::Saved
            }
            Err(e) => {
                self.transition(TrackState::LyricsNotSaved);
                SaveOutcome::Failed(e.to_string())
            }
        }
    }

    /// Drop the candidate and return to `TagsRead`.
    ///
    /// Returns `false` when there was no candidate to drop.
    pub fn discard_candidate(&mut self) -> bool {
        if !self.has_lyrics_new() {
            return false;
        }
        self.lyrics_new.clear();
        self.transition(TrackState::TagsRead);
        true
    }

    /// First `lines` lines of the lyrics to display: the candidate when
    /// there is one, the stored lyrics otherwise.
    pub fn lyrics_preview(&self, lines: usize) -> String {
        let source = if self.has_lyrics_new() {
            &self.lyrics_new
        } else {
            &self.lyrics_original
        };
        source.lines().take(lines).collect::<Vec<_>>().join("\n")
    }

    fn transition(&mut self, next: TrackState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid transition {:?} -> {:?}",
            self.state,
            next
        );
        tracing::trace!(target: "model", file = %self.filename, from = ?self.state, to = ?next, "State change");
        self.state = next;
    }
}
