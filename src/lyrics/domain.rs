//! Internal domain models for lyrics acquisition.
//!
//! These types are OUR types - they don't change when the remote service
//! changes. Provider responses get converted into these types via adapters.

use std::fmt;

/// Length of a client access token.
pub const TOKEN_LENGTH: usize = 64;

/// A single remote search result considered as a possible match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRef {
    /// Remote song identifier
    pub id: u64,
    /// Song title as reported by the service
    pub title: String,
    /// Primary artist as reported by the service
    pub artist_name: String,
    /// Song page URL, if the service provides one
    pub url: Option<String>,
}

/// Raw lyrics fetched for a candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongLyrics {
    /// Artist the lyrics are attributed to
    pub artist_name: String,
    /// Lyrics, one entry per line, unformatted
    pub lines: Vec<String>,
}

impl SongLyrics {
    /// Total number of characters across all lines.
    pub fn char_count(&self) -> usize {
        self.lines.iter().map(|l| l.chars().count()).sum()
    }
}

/// Validated client access token.
///
/// Construct with [`AccessToken::parse`]; holding one means the format was
/// checked before any remote call.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Validate a raw token: 64 characters from `[A-Za-z0-9_-]`.
    pub fn parse(raw: &str) -> Result<Self, LyricsError> {
        let raw = raw.trim();
        if raw.chars().count() != TOKEN_LENGTH {
            return Err(LyricsError::InvalidToken(format!(
                "expected {} characters, got {}",
                TOKEN_LENGTH,
                raw.chars().count()
            )));
        }
        if let Some(bad) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(LyricsError::InvalidToken(format!(
                "unexpected character '{}'",
                bad
            )));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Never print the secret itself
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken({}…)", &self.0[..4])
    }
}

/// Lyrics rejected by a discard heuristic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Discarded the lyrics because {reason} for the track '{title}': {length} characters")]
pub struct DiscardLyrics {
    /// Name of the heuristic that fired
    pub reason: String,
    /// Title of the track being resolved
    pub title: String,
    /// Number of characters that triggered the rejection
    pub length: usize,
}

impl DiscardLyrics {
    pub fn new(reason: impl Into<String>, title: impl Into<String>, length: usize) -> Self {
        Self {
            reason: reason.into(),
            title: title.into(),
            length,
        }
    }
}

/// Errors that can occur during lyrics acquisition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LyricsError {
    #[error("Invalid access token: {0}")]
    InvalidToken(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API request failed: {0}")]
    Api(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Rate limited - try again later")]
    RateLimited,

    #[error("No usable candidate found")]
    NoCandidateFound,

    #[error("A lyrics search is already running")]
    SearchInProgress,
}

impl LyricsError {
    /// Whether this error came from the transport or the remote service.
    pub fn is_remote_failure(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Api(_) | Self::Parse(_) | Self::RateLimited
        )
    }

    /// Whether no later request can succeed either, ending the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidToken(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_token() -> String {
        "aB3_-".repeat(12) + "abcd"
    }

    #[test]
    fn test_token_accepts_valid_alphabet() {
        let raw = valid_token();
        assert_eq!(raw.len(), 64);
        let token = AccessToken::parse(&raw).unwrap();
        assert_eq!(token.as_str(), raw);
    }

    #[test]
    fn test_token_rejects_wrong_length() {
        let result = AccessToken::parse("abc");
        assert!(matches!(result, Err(LyricsError::InvalidToken(_))));
    }

    #[test]
    fn test_token_rejects_bad_character() {
        let mut raw = valid_token();
        raw.replace_range(10..11, "!");
        let err = AccessToken::parse(&raw).unwrap_err();
        assert!(err.to_string().contains('!'));
    }

    #[test]
    fn test_token_debug_hides_secret() {
        let token = AccessToken::parse(&valid_token()).unwrap();
        let debug = format!("{:?}", token);
        assert!(!debug.contains(&valid_token()));
    }

    #[test]
    fn test_discard_message() {
        let err = DiscardLyrics::new("a line is too long", "Song", 612);
        assert_eq!(
            err.to_string(),
            "Discarded the lyrics because a line is too long for the track 'Song': 612 characters"
        );
    }

    #[test]
    fn test_remote_failure_classification() {
        assert!(LyricsError::Network("timeout".into()).is_remote_failure());
        assert!(LyricsError::RateLimited.is_remote_failure());
        assert!(!LyricsError::NoCandidateFound.is_remote_failure());
        assert!(!LyricsError::InvalidToken("x".into()).is_remote_failure());
    }

    #[test]
    fn test_only_rejected_token_is_fatal() {
        assert!(LyricsError::InvalidToken("revoked".into()).is_fatal());
        assert!(!LyricsError::RateLimited.is_fatal());
        assert!(!LyricsError::Network("timeout".into()).is_fatal());
        assert!(!LyricsError::NoCandidateFound.is_fatal());
    }
}
