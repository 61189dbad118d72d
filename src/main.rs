//! Lyrics Tagger - finds lyrics for audio files and writes them to their tags.
//!
//! Tracks are resolved against the Genius catalog on a background worker,
//! checked by heuristics that catch wrong matches, and saved into the ID3v2
//! or Vorbis comment tags of mp3 and flac files.

pub mod cli;
pub mod config;
pub mod error;
pub mod library;
pub mod lyrics;
pub mod metadata;
pub mod model;
pub mod scanner;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging; subsystem targets (`lyrics::resolver`, `library`, ...)
    // log warnings unless RUST_LOG says otherwise
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy()
        .add_directive("lyrics_tagger=info".parse()?);
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();

    cli::run_command(&args)
}
