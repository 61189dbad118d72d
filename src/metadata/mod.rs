//! Audio file tag reading and lyrics writing.
//!
//! Uses the lofty crate for format-independent tag access. Only two file
//! kinds are handled:
//! - MP3: lyrics live in the ID3v2 tag (USLT frame)
//! - FLAC: lyrics live in the Vorbis comments (`LYRICS` field)
//!
//! The rest of the application goes through the [`TagStore`] trait and never
//! branches on the file kind itself.

use lofty::config::WriteOptions;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, Tag, TagExt, TagType};
use std::borrow::Cow;
use std::path::Path;

use crate::error::{Error, Result};

/// Supported audio file kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Mp3,
    Flac,
}

impl FileKind {
    /// Detect the kind from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "mp3" => Some(Self::Mp3),
            "flac" => Some(Self::Flac),
            _ => None,
        }
    }

    /// Tag format the lyrics are read from and written to.
    pub fn tag_type(self) -> TagType {
        match self {
            Self::Mp3 => TagType::Id3v2,
            Self::Flac => TagType::VorbisComments,
        }
    }
}

/// Tags read from a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackTags {
    pub title: String,
    /// Raw artist field, possibly listing several artists
    pub artist: String,
    pub album: String,
    pub duration_seconds: u64,
    pub lyrics: Option<String>,
    pub cover: Option<Vec<u8>>,
}

/// Access to the tags stored in audio files.
pub trait TagStore: Send + Sync {
    /// Read the tags of a file.
    fn read_tags(&self, path: &Path, kind: FileKind) -> Result<TrackTags>;

    /// Replace the lyrics stored in a file.
    fn write_lyrics(&self, path: &Path, kind: FileKind, lyrics: &str) -> Result<()>;
}

/// [`TagStore`] backed by lofty.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyTagStore;

impl TagStore for LoftyTagStore {
    fn read_tags(&self, path: &Path, kind: FileKind) -> Result<TrackTags> {
        let tagged_file = Probe::open(path)
            .map_err(|e| Error::metadata(path, format!("failed to open file: {}", e)))?
            .read()
            .map_err(|e| Error::metadata(path, format!("failed to read tags: {}", e)))?;

        // Prefer the tag lyrics are written to, then whatever the file has
        let tag = tagged_file
            .tag(kind.tag_type())
            .or_else(|| tagged_file.primary_tag())
            .or_else(|| tagged_file.first_tag());

        Ok(TrackTags {
            title: text(tag.and_then(|t| t.title())),
            artist: text(tag.and_then(|t| t.artist())),
            album: text(tag.and_then(|t| t.album())),
            duration_seconds: tagged_file.properties().duration().as_secs(),
            lyrics: tag
                .and_then(|t| t.get_string(&ItemKey::Lyrics))
                .filter(|l| !l.is_empty())
                .map(str::to_string),
            cover: tag
                .and_then(|t| t.pictures().first())
                .map(|p| p.data().to_vec()),
        })
    }

    fn write_lyrics(&self, path: &Path, kind: FileKind, lyrics: &str) -> Result<()> {
        let mut tagged_file = Probe::open(path)
            .map_err(|e| Error::metadata(path, format!("failed to open file: {}", e)))?
            .read()
            .map_err(|e| Error::metadata(path, format!("failed to read tags: {}", e)))?;

        let tag_type = kind.tag_type();
        if tagged_file.tag(tag_type).is_none() {
            tagged_file.insert_tag(Tag::new(tag_type));
        }
        let tag = tagged_file
            .tag_mut(tag_type)
            .ok_or_else(|| Error::metadata(path, format!("no {:?} tag available", tag_type)))?;

        tag.insert_text(ItemKey::Lyrics, lyrics.to_string());
        tag.save_to_path(path, WriteOptions::default())
            .map_err(|e| Error::metadata(path, format!("failed to write tags: {}", e)))?;

        tracing::debug!(target: "metadata", path = %path.display(), "Lyrics written");
        Ok(())
    }
}

fn text(value: Option<Cow<'_, str>>) -> String {
    value.map(|s| s.into_owned()).unwrap_or_default()
}
