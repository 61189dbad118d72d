//! File inspection and settings commands.

use std::path::Path;

use crate::config;
use crate::error::Error;
use crate::lyrics::AccessToken;
use crate::metadata::{FileKind, LoftyTagStore, TagStore};
use crate::model::TrackRecord;

/// Show the tags and lyrics of an audio file
pub fn cmd_show(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        return Err(Error::not_found(path).into());
    }
    let kind = FileKind::from_path(path).ok_or_else(|| Error::unsupported(path))?;
    let tags = LoftyTagStore.read_tags(path, kind)?;
    let track = TrackRecord::from_tags(path, kind, tags);

    println!("File:     {}", track.filename());
    println!("Title:    {}", track.title);
    println!("Artists:  {}", track.artists.join(", "));
    println!("Album:    {}", track.album);
    println!(
        "Duration: {}:{:02}",
        track.duration_seconds / 60,
        track.duration_seconds % 60
    );
    match &track.cover {
        Some(cover) => println!("Cover:    {} bytes", cover.len()),
        None => println!("Cover:    none"),
    }
    println!();

    if track.has_lyrics_original() {
        println!("{}", track.lyrics_original);
    } else {
        println!("(no lyrics)");
    }
    Ok(())
}

/// Validate and persist the access token
pub fn cmd_set_token(raw: &str) -> anyhow::Result<()> {
    let token = AccessToken::parse(raw)?;

    let mut config = config::load();
    config.credentials.genius_token = Some(token.as_str().to_string());
    let path = config::save(&config)?;

    println!("✓ Token saved to {}", path.display());
    Ok(())
}

/// Print the config file location and the effective configuration
pub fn cmd_config() -> anyhow::Result<()> {
    match config::config_path() {
        Some(path) if path.exists() => println!("Config file: {}", path.display()),
        Some(path) => println!("Config file: {} (not created yet)", path.display()),
        None => println!("Config file: unavailable"),
    }
    println!();

    let mut config = config::load();
    if let Some(token) = config.credentials.genius_token.as_mut() {
        *token = mask(token);
    }
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

/// Keep the first four characters of a secret
fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{}…", visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_hides_secret() {
        assert_eq!(mask("abcdefgh"), "abcd…");
        assert_eq!(mask("ab"), "ab…");
    }

    #[test]
    fn test_set_token_rejects_invalid_token() {
        // Fails on validation, before touching the config file
        assert!(cmd_set_token("too-short").is_err());
    }

    #[test]
    fn test_show_missing_file() {
        let err = cmd_show(Path::new("/no/such/file.mp3")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
