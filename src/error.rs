//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`, while the
//! CLI and `main` use `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level application error enum
//! - Module-specific errors (e.g., [`LyricsError`], `ConfigError`) for detailed handling
//! - All errors implement `std::error::Error` for compatibility
//!
//! # Example
//!
//! ```ignore
//! use lyrics_tagger::error::{Error, Result};
//!
//! fn load(path: &Path) -> Result<TrackRecord> {
//!     let kind = FileKind::from_path(path).ok_or_else(|| Error::unsupported(path))?;
//!     let tags = store.read_tags(path, kind)?;
//!     Ok(TrackRecord::from_tags(path, kind, tags))
//! }
//! ```

use std::path::PathBuf;

use crate::lyrics::LyricsError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tag reading/writing error
    #[error("Metadata error for {path}: {message}")]
    Metadata { path: PathBuf, message: String },

    /// File kind without lyrics support
    #[error("Unsupported file: {0}")]
    UnsupportedFile(PathBuf),

    /// Lyrics acquisition error
    #[error("Lyrics error: {0}")]
    Lyrics(#[from] LyricsError),

    /// File not found
    #[error("File not found: {0}")]
    NotFound(PathBuf),

}

impl Error {
    /// Create a metadata error.
    pub fn metadata(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Metadata {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported file error.
    pub fn unsupported(path: impl Into<PathBuf>) -> Self {
        Self::UnsupportedFile(path.into())
    }

    /// Create a not found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound(path.into())
    }

}
