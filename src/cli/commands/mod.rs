//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule for maintainability:
//! - `search`: Lyrics search, review and saving for a folder or file
//! - `tags`: Inspecting files, storing the access token, showing the config

mod search;
mod tags;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

pub use search::{SearchArgs, cmd_search};
pub use tags::{cmd_config, cmd_set_token, cmd_show};

/// Lyrics Tagger CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Search lyrics for the audio files of a folder (or a single file)
    Search(SearchArgs),
    /// Show the tags and lyrics of an audio file
    Show {
        /// Path to the audio file
        path: PathBuf,
    },
    /// Validate and store the Genius access token
    SetToken {
        /// Client access token (64 characters)
        token: String,
    },
    /// Show the config file location and the effective configuration
    Config,
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Search(args) => {
            let rt = Runtime::new()?;
            cmd_search(&rt, args)
        }
        Commands::Show { path } => cmd_show(path),
        Commands::SetToken { token } => cmd_set_token(token),
        Commands::Config => cmd_config(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_flags() {
        let cli = Cli::try_parse_from([
            "lyrics-tagger",
            "search",
            "/music",
            "-r",
            "-o",
            "--save",
            "--max-candidates",
            "3",
        ])
        .unwrap();

        let Commands::Search(args) = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(args.path, PathBuf::from("/music"));
        assert!(args.recursive);
        assert!(args.overwrite);
        assert!(args.save);
        assert!(!args.review);
        assert_eq!(args.max_candidates, Some(3));
    }

    #[test]
    fn test_recursive_and_flat_conflict() {
        let result = Cli::try_parse_from(["lyrics-tagger", "search", "/music", "-r", "--flat"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_set_token() {
        let cli = Cli::try_parse_from(["lyrics-tagger", "set-token", "abc"]).unwrap();
        assert!(matches!(cli.command, Commands::SetToken { ref token } if token == "abc"));
    }

    #[test]
    fn test_command_is_required() {
        assert!(Cli::try_parse_from(["lyrics-tagger"]).is_err());
    }
}
