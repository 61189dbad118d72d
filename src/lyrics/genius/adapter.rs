//! Adapter layer: Convert Genius DTOs and song pages to domain models
//!
//! This is the ONLY place where Genius response shapes are turned into
//! domain types.

use scraper::{ElementRef, Html, Node, Selector};

use super::dto;
use crate::lyrics::domain::{CandidateRef, LyricsError, SongLyrics};

/// Elements holding the lyrics on a song page
const LYRICS_CONTAINER: &str = r#"div[data-lyrics-container="true"]"#;

/// Convert a search response to candidates, best match first
pub fn to_candidates(response: dto::SearchResponse) -> Result<Vec<CandidateRef>, LyricsError> {
    if response.meta.status != 200 {
        return Err(LyricsError::Api(
            response
                .meta
                .message
                .unwrap_or_else(|| format!("status {}", response.meta.status)),
        ));
    }

    Ok(response
        .response
        .map(|body| body.hits)
        .unwrap_or_default()
        .into_iter()
        .filter(|hit| hit.hit_type == "song")
        .map(|hit| to_candidate(hit.result))
        .collect())
}

/// Convert a single song to a candidate
pub fn to_candidate(song: dto::Song) -> CandidateRef {
    CandidateRef {
        id: song.id,
        title: song.title,
        artist_name: song.primary_artist.map(|a| a.name).unwrap_or_default(),
        url: song.url,
    }
}

/// Extract the lyrics lines from a song page.
///
/// Text of every lyrics container is concatenated, `<br>` becoming a line
/// break. Page decorations flagged as excluded from selection are skipped.
pub fn extract_lyrics(html: &str, artist_name: &str) -> Result<SongLyrics, LyricsError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(LYRICS_CONTAINER)
        .map_err(|e| LyricsError::Parse(format!("invalid selector: {:?}", e)))?;

    let mut text = String::new();
    let mut containers = 0;
    for container in document.select(&selector) {
        containers += 1;
        collect_text(container, &mut text);
        text.push('\n');
    }

    if containers == 0 {
        return Err(LyricsError::Parse(
            "no lyrics container on the song page".to_string(),
        ));
    }

    let mut lines: Vec<String> = text.trim_end().split('\n').map(str::to_string).collect();
    if lines.first().is_some_and(|l| is_page_header(l)) {
        lines.remove(0);
    }

    Ok(SongLyrics {
        artist_name: artist_name.to_string(),
        lines,
    })
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if el.name() == "br" => out.push('\n'),
            Node::Element(el) if el.attr("data-exclude-from-selection") == Some("true") => {}
            Node::Element(_) => {
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_text(child_ref, out);
                }
            }
            _ => {}
        }
    }
}

/// "12 Contributors Bohemian Rhapsody Lyrics"
fn is_page_header(line: &str) -> bool {
    line.contains("Contributor") && line.trim_end().ends_with("Lyrics")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_JSON: &str = r#"{
        "meta": { "status": 200 },
        "response": {
            "hits": [
                {
                    "type": "song",
                    "result": {
                        "id": 378195,
                        "title": "Bohemian Rhapsody",
                        "url": "https://genius.com/Queen-bohemian-rhapsody-lyrics",
                        "primary_artist": { "id": 563, "name": "Queen" }
                    }
                },
                {
                    "type": "song",
                    "result": { "id": 42, "title": "Cover", "url": null, "primary_artist": null }
                }
            ]
        }
    }"#;

    #[test]
    fn test_search_response_to_candidates() {
        let response: dto::SearchResponse = serde_json::from_str(SEARCH_JSON).unwrap();
        let candidates = to_candidates(response).unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].id, 378195);
        assert_eq!(candidates[0].artist_name, "Queen");
        assert!(candidates[0].url.as_deref().unwrap().ends_with("-lyrics"));
        assert_eq!(candidates[1].artist_name, "");
    }

    #[test]
    fn test_non_song_hits_are_ignored() {
        let json = r#"{
            "meta": { "status": 200 },
            "response": { "hits": [
                { "type": "album", "result": { "id": 1, "title": "x" } }
            ] }
        }"#;
        let response: dto::SearchResponse = serde_json::from_str(json).unwrap();
        assert!(to_candidates(response).unwrap().is_empty());
    }

    #[test]
    fn test_error_status() {
        let json = r#"{ "meta": { "status": 401, "message": "invalid token" } }"#;
        let response: dto::SearchResponse = serde_json::from_str(json).unwrap();
        let err = to_candidates(response).unwrap_err();
        assert!(err.to_string().contains("invalid token"));
    }

    #[test]
    fn test_extract_lyrics_from_page() {
        let html = r#"<html><body>
            <div data-lyrics-container="true"><div data-exclude-from-selection="true">Translations</div>[Intro]<br>Is this the real life?<br><a href="/x"><span>Is this just fantasy?</span></a></div>
            <div data-lyrics-container="true">Caught in a landslide</div>
        </body></html>"#;

        let lyrics = extract_lyrics(html, "Queen").unwrap();
        assert_eq!(lyrics.artist_name, "Queen");
        assert_eq!(
            lyrics.lines,
            vec![
                "[Intro]",
                "Is this the real life?",
                "Is this just fantasy?",
                "Caught in a landslide"
            ]
        );
    }

    #[test]
    fn test_extract_lyrics_drops_page_header() {
        let html = r#"<div data-lyrics-container="true">3 Contributors Song Lyrics<br>First line</div>"#;
        let lyrics = extract_lyrics(html, "A").unwrap();
        assert_eq!(lyrics.lines, vec!["First line"]);
    }

    #[test]
    fn test_extract_lyrics_without_container() {
        let result = extract_lyrics("<html><body>nothing</body></html>", "A");
        assert!(matches!(result, Err(LyricsError::Parse(_))));
    }
}
