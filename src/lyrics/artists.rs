//! Artist and title normalisation applied before searching.
//!
//! Tags frequently carry several artists in one field ("A feat. B") and
//! version qualifiers in the title ("Song (Radio Edit)"). Both make remote
//! searches miss, so the query is built from the main artist and a cleaned
//! title only.

/// Separators between artists, in priority order.
///
/// At a given position the first separator in this list that matches wins,
/// so `" feat. "` is tried before `" feat "`.
pub const ARTIST_SEPARATORS: [&str; 7] = [
    " featuring ",
    " feat. ",
    " feat ",
    " ft. ",
    " ft ",
    " & ",
    " / ",
];

/// Title qualifiers that would probably make the search fail.
pub const UNWANTED_TITLE_TEXT: [&str; 8] = [
    "(radio)",
    "(radio edit)",
    "(live)",
    "(live version)",
    "(alternative)",
    "(alternative version)",
    "(extended)",
    "(extended version)",
];

/// Split a raw artist tag into its artists, in order of appearance.
///
/// Splitting is case-sensitive and scans left to right. A field without any
/// separator yields a single element; an empty field yields no element.
pub fn split_artists(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }

    let mut artists = Vec::new();
    let mut segment_start = 0;
    let mut pos = 0;

    while pos < raw.len() {
        let rest = &raw[pos..];
        if let Some(sep) = ARTIST_SEPARATORS.iter().find(|sep| rest.starts_with(*sep)) {
            artists.push(raw[segment_start..pos].to_string());
            pos += sep.len();
            segment_start = pos;
            continue;
        }
        // Advance one character, staying on a char boundary
        pos += rest.chars().next().map_or(1, char::len_utf8);
    }
    artists.push(raw[segment_start..].to_string());

    artists
}

/// First artist of the list, or an empty string.
pub fn main_artist(artists: &[String]) -> String {
    artists.first().cloned().unwrap_or_default()
}

/// Remove version qualifiers from a title and trim it.
pub fn clean_title_for_search(title: &str) -> String {
    let mut cleaned = title.to_string();

    // Removing one qualifier can expose another, so repeat until stable
    loop {
        let mut changed = false;
        for unwanted in UNWANTED_TITLE_TEXT {
            while let Some(start) = find_ignore_ascii_case(&cleaned, unwanted) {
                cleaned.replace_range(start..start + unwanted.len(), "");
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    cleaned.trim().to_string()
}

/// Byte offset of the first ASCII-case-insensitive occurrence of `needle`.
///
/// `needle` must be ASCII, which guarantees the match sits on char boundaries.
fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}
