//! Normalisation of fetched lyrics into their stored form.
//!
//! Formatting is idempotent: feeding formatted lyrics back in returns them
//! unchanged.

use super::domain::DiscardLyrics;

/// Any line longer than this signals corrupted or non-lyrics text.
pub const MAX_LINE_LENGTH: usize = 500;

/// Suggestion block appended by song pages after the lyrics.
const FOOTER_SUGGESTIONS: &str = "You might also like";

/// Embed counter appended to the last line of song pages.
const FOOTER_EMBED: &str = "Embed";

/// Format raw lyrics lines.
///
/// Section markers such as `[Chorus]` are blanked, runs of blank lines are
/// collapsed to one, footer artifacts are removed and the result is trimmed.
pub fn format<S: AsRef<str>>(title: &str, raw_lines: &[S]) -> Result<String, DiscardLyrics> {
    if let Some(length) = raw_lines
        .iter()
        .map(|l| l.as_ref().chars().count())
        .find(|len| *len > MAX_LINE_LENGTH)
    {
        return Err(DiscardLyrics::new("a line is too long", title, length));
    }

    let mut lines: Vec<String> = raw_lines.iter().map(|l| normalize_line(l.as_ref())).collect();
    strip_footer(&mut lines);

    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
    for line in &lines {
        let previous_blank = kept.last().is_some_and(|l| l.is_empty());
        if line.is_empty() && previous_blank {
            continue;
        }
        kept.push(line);
    }

    Ok(kept.join("\n").trim().to_string())
}

/// Format lyrics held as a single block of text.
pub fn format_text(title: &str, text: &str) -> Result<String, DiscardLyrics> {
    let lines: Vec<&str> = text.split('\n').collect();
    format(title, &lines)
}

/// Trim a line, blanking it when it is a section marker.
fn normalize_line(line: &str) -> String {
    let line = line.trim();
    if line.starts_with('[') && line.ends_with(']') {
        String::new()
    } else {
        line.to_string()
    }
}

/// Remove trailing footer artifacts until the last line is lyrics.
fn strip_footer(lines: &mut Vec<String>) {
    while let Some(last) = lines.iter().rposition(|l| !l.is_empty()) {
        if lines[last] == FOOTER_SUGGESTIONS {
            lines.truncate(last);
            continue;
        }
        if let Some(stripped) = strip_embed_marker(&lines[last]) {
            lines[last] = normalize_line(stripped);
            continue;
        }
        break;
    }
}

/// `"last line42Embed"` -> `Some("last line")`.
fn strip_embed_marker(line: &str) -> Option<&str> {
    let rest = line.strip_suffix(FOOTER_EMBED)?;
    let without_digits = rest.trim_end_matches(|c: char| c.is_ascii_digit());
    (without_digits.len() < rest.len()).then_some(without_digits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_blanks_section_markers() {
        let raw = ["[Verse 1]", "Line one", "Line two", "[Chorus]", "Chorus line"];
        let formatted = format("Song", &raw).unwrap();
        assert_eq!(formatted, "Line one\nLine two\n\nChorus line");
    }

    #[test]
    fn test_collapses_blank_runs() {
        let raw = ["a", "", "", "", "b", "", "c"];
        assert_eq!(format("Song", &raw).unwrap(), "a\n\nb\n\nc");
    }

    #[test]
    fn test_trims_lines_and_result() {
        let raw = ["", "  first  ", "second\t", "", ""];
        assert_eq!(format("Song", &raw).unwrap(), "first\nsecond");
    }

    #[test]
    fn test_strips_embed_footer() {
        let raw = ["Line one", "Last line42Embed"];
        assert_eq!(format("Song", &raw).unwrap(), "Line one\nLast line");
    }

    #[test]
    fn test_strips_suggestions_footer() {
        let raw = ["Line one", "", "You might also like", "12Embed"];
        assert_eq!(format("Song", &raw).unwrap(), "Line one");
    }

    #[test]
    fn test_keeps_word_embed_without_counter() {
        let raw = ["We embed", "Deep Embed"];
        assert_eq!(format("Song", &raw).unwrap(), "We embed\nDeep Embed");
    }

    #[test]
    fn test_long_line_discards() {
        let long = "x".repeat(MAX_LINE_LENGTH + 1);
        let raw = ["ok".to_string(), long];
        let err = format("Song", &raw).unwrap_err();
        assert_eq!(err.length, MAX_LINE_LENGTH + 1);
        assert_eq!(err.title, "Song");
    }

    #[test]
    fn test_line_at_limit_is_kept() {
        let line = "x".repeat(MAX_LINE_LENGTH);
        assert_eq!(format("Song", &[line.as_str()]).unwrap(), line);
    }

    #[test]
    fn test_format_text_splits_lines() {
        let text = "[Intro]\nHello\n\n\n\nWorld\n";
        assert_eq!(format_text("Song", text).unwrap(), "Hello\n\nWorld");
    }

    fn lyrics_line() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-z ]{0,20}",
            "\\[[A-Za-z 0-9]{0,10}\\]",
            "[a-z]{1,10}[0-9]{1,3}Embed",
            Just("You might also like".to_string()),
            Just(String::new()),
        ]
    }

    proptest! {
        #[test]
        fn prop_format_idempotent(lines in proptest::collection::vec(lyrics_line(), 0..30)) {
            let once = format("Song", &lines).unwrap();
            let twice = format_text("Song", &once).unwrap();
            prop_assert_eq!(twice, once);
        }

        #[test]
        fn prop_long_line_always_discards(
            lines in proptest::collection::vec("[a-z ]{0,40}", 0..10),
            extra in 1usize..200,
            position in 0usize..10,
        ) {
            let mut lines = lines;
            let at = position.min(lines.len());
            lines.insert(at, "y".repeat(MAX_LINE_LENGTH + extra));
            prop_assert!(format("Song", &lines).is_err());
        }

        #[test]
        fn prop_short_lines_never_discard(
            lines in proptest::collection::vec("[a-z \\[\\]]{0,500}", 0..10),
        ) {
            prop_assert!(format("Song", &lines).is_ok());
        }
    }
}
