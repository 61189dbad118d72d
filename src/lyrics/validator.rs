//! Heuristics that reject an obviously wrong candidate.

use super::domain::{DiscardLyrics, SongLyrics};

/// If the artist is one of these, the lyrics are certainly wrong.
pub const DISCARD_ARTISTS: [&str; 3] = ["Genius", "Apple Music", "Pop Genius"];

/// Placeholder shown by the service when a song has no lyrics yet.
pub const MISSING_LYRICS: &str = "Tell us that you would like to have the lyrics of this song.";

/// Above this many characters the match is most likely bulk text.
pub const MAX_LYRICS_LENGTH: usize = 15_000;

/// Check a candidate's lyrics, returning the reason when they are rejected.
pub fn inspect(title: &str, lyrics: &SongLyrics) -> Result<(), DiscardLyrics> {
    if DISCARD_ARTISTS.contains(&lyrics.artist_name.as_str()) {
        return Err(DiscardLyrics::new(
            format!("the artist is '{}'", lyrics.artist_name),
            title,
            lyrics.char_count(),
        ));
    }

    let length = lyrics.char_count();
    if length > MAX_LYRICS_LENGTH {
        return Err(DiscardLyrics::new("the lyrics are too long", title, length));
    }

    if let Some(first) = lyrics.lines.first()
        && first.trim_start().starts_with(MISSING_LYRICS)
    {
        return Err(DiscardLyrics::new("the lyrics are missing", title, first.len()));
    }

    Ok(())
}

/// `true` when the candidate's lyrics may be kept.
pub fn check(title: &str, lyrics: &SongLyrics) -> bool {
    inspect(title, lyrics).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lyrics(artist: &str, lines: &[&str]) -> SongLyrics {
        SongLyrics {
            artist_name: artist.to_string(),
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }

    #[test]
    fn test_accepts_regular_lyrics() {
        assert!(check("Song", &lyrics("Queen", &["Is this the real life?", "Is this just fantasy?"])));
    }

    #[test]
    fn test_rejects_missing_lyrics_placeholder() {
        let candidate = lyrics("Queen", &[MISSING_LYRICS, ""]);
        assert!(!check("Song", &candidate));
        let err = inspect("Song", &candidate).unwrap_err();
        assert!(err.reason.contains("missing"));
    }

    #[test]
    fn test_rejects_too_long() {
        let line = "la ".repeat(1000);
        let lines: Vec<&str> = std::iter::repeat_n(line.as_str(), 6).collect();
        let err = inspect("Song", &lyrics("Queen", &lines)).unwrap_err();
        assert_eq!(err.length, 18_000);
    }

    #[test]
    fn test_length_threshold_is_inclusive() {
        let line = "a".repeat(MAX_LYRICS_LENGTH);
        assert!(check("Song", &lyrics("Queen", &[line.as_str()])));
    }

    #[test]
    fn test_empty_lyrics_accepted() {
        assert!(check("Song", &SongLyrics::default()));
    }

    proptest! {
        #[test]
        fn prop_discard_artist_always_rejected(
            idx in 0usize..DISCARD_ARTISTS.len(),
            lines in proptest::collection::vec("[a-z ]{0,30}", 0..10),
        ) {
            let candidate = SongLyrics {
                artist_name: DISCARD_ARTISTS[idx].to_string(),
                lines,
            };
            prop_assert!(!check("Any", &candidate));
        }
    }
}
