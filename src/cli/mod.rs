//! Command-line interface for lyrics-tagger.
//!
//! This module provides CLI commands for searching, reviewing and saving
//! lyrics, and for inspecting files and settings.

mod commands;

pub use commands::{Cli, Commands, run_command};
