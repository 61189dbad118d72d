//! Lyrics search command.

use anyhow::Context;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;

use crate::config;
use crate::library::{SaveReport, WorkingSet};
use crate::lyrics::{AccessToken, CancelFlag, GeniusClient, SearchSummary};
use crate::metadata::LoftyTagStore;
use crate::model::TrackState;
use crate::scanner;

/// Lines of lyrics shown per track when reviewing
const PREVIEW_LINES: usize = 8;

/// Exit status after an interrupt (128 + SIGINT)
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Arguments of the `search` command
#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Folder (or single file) to tag
    pub path: PathBuf,
    /// Include subfolders (default from config)
    #[arg(short, long, conflicts_with = "flat")]
    pub recursive: bool,
    /// Only look at the folder itself
    #[arg(long)]
    pub flat: bool,
    /// Also search files that already contain lyrics
    #[arg(short, long)]
    pub overwrite: bool,
    /// Genius access token (or set GENIUS_ACCESS_TOKEN env var)
    #[arg(short, long, env = "GENIUS_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
    /// Write the found lyrics to the files
    #[arg(long)]
    pub save: bool,
    /// Ask for confirmation of every found lyrics
    #[arg(long)]
    pub review: bool,
    /// Candidates tried per track
    #[arg(long)]
    pub max_candidates: Option<usize>,
}

/// Search lyrics for every supported file under a path
pub fn cmd_search(rt: &Runtime, args: &SearchArgs) -> anyhow::Result<()> {
    let mut config = config::load();

    let Some(raw_token) = args
        .token
        .clone()
        .or_else(|| config.credentials.genius_token.clone())
    else {
        eprintln!("Error: Genius access token required.");
        eprintln!("Get one at: https://genius.com/api-clients");
        eprintln!("Then use: --token YOUR_TOKEN, set GENIUS_ACCESS_TOKEN or run `set-token`");
        std::process::exit(1);
    };
    // An invalid token stops here, before any request
    let token = AccessToken::parse(&raw_token)?;
    let client = GeniusClient::new(token)?;

    let recursive = if args.flat {
        false
    } else {
        args.recursive || config.library.recursive_search
    };
    let mut options = config.search.options();
    options.overwrite_existing |= args.overwrite;
    if let Some(max_candidates) = args.max_candidates {
        options.max_candidates = max_candidates;
    }

    let files = scanner::discover(&args.path, recursive);
    if files.is_empty() {
        println!("No audio files found.");
        return Ok(());
    }
    remember_folder(&mut config, &args.path);

    let store = LoftyTagStore;
    let mut set = WorkingSet::new();
    let added = set.add_files(&store, files);
    for (path, error) in &added.errors {
        eprintln!("✗ {}: {}", path.display(), error);
    }
    if set.total() == 0 {
        println!("No readable audio files.");
        return Ok(());
    }

    println!("Searching lyrics for {} file(s)... (Ctrl-C to stop)\n", set.total());
    set.start_search(client, options)?;

    let searching = Arc::new(AtomicBool::new(true));
    let interrupts = set
        .cancel_flag()
        .map(|cancel| handle_interrupts(rt, cancel, Arc::clone(&searching)));

    let total = set.total();
    let summary = set
        .wait(|done, track| {
            let mark = match track.state() {
                TrackState::LyricsFound => "✓",
                TrackState::LyricsNotFound => "✗",
                _ => "-",
            };
            println!("[{}/{}] {} {} ({})", done, total, mark, track.filename(), track.state());
        })
        .context("search did not run")?;
    // From here on Ctrl-C quits without saving
    searching.store(false, Ordering::SeqCst);

    if let Some(error) = &summary.error {
        eprintln!("\nError: {}", error);
        eprintln!("Check the token with `set-token` or --token.");
    }

    if args.review {
        review(&mut set)?;
    }

    let saved = if args.save && set.has_pending_lyrics() {
        Some(set.save_all(&store)?)
    } else {
        None
    };

    print_stats(&summary, saved.as_ref());
    if saved.is_none() && set.has_pending_lyrics() {
        println!("\nRun with --save to write the lyrics.");
    }

    if let Some(handle) = interrupts {
        handle.abort();
    }
    match summary.error {
        Some(error) => Err(error).context("search stopped early"),
        None => Ok(()),
    }
}

/// What a Ctrl-C press does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interrupt {
    /// Let the current track finish, skip the rest
    StopSearch,
    /// Quit now, saving nothing
    Exit,
}

/// The first press during a search stops it; any other press quits.
fn interrupt_action(searching: bool, cancel: &CancelFlag) -> Interrupt {
    if searching && !cancel.is_cancelled() {
        Interrupt::StopSearch
    } else {
        Interrupt::Exit
    }
}

/// Take over Ctrl-C for the rest of the command.
///
/// Installing the handler replaces the default SIGINT behaviour, so every
/// press must end in either a cancel or an exit.
fn handle_interrupts(rt: &Runtime, cancel: CancelFlag, searching: Arc<AtomicBool>) -> JoinHandle<()> {
    rt.spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            match interrupt_action(searching.load(Ordering::SeqCst), &cancel) {
                Interrupt::StopSearch => {
                    eprintln!("\nStopping after the current track... (Ctrl-C again to quit)");
                    cancel.cancel();
                }
                Interrupt::Exit => {
                    eprintln!("\nInterrupted, nothing saved.");
                    std::process::exit(INTERRUPTED_EXIT_CODE);
                }
            }
        }
    })
}

/// Ask for each found candidate whether to keep it
fn review(set: &mut WorkingSet) -> anyhow::Result<()> {
    let pending: Vec<usize> = set
        .tracks()
        .iter()
        .enumerate()
        .filter(|(_, t)| t.has_lyrics_new())
        .map(|(i, _)| i)
        .collect();

    let mut rejected = Vec::new();
    for index in pending {
        let Some(track) = set.get(index) else {
            continue;
        };
        println!();
        println!("── {} ({} - {})", track.filename(), track.main_artist, track.title);
        println!("{}", track.lyrics_preview(PREVIEW_LINES));
        if !confirm("Keep these lyrics? [Y/n] ")? {
            rejected.push(index);
        }
    }

    let discarded = set.discard(&rejected)?;
    if discarded > 0 {
        println!("\nDiscarded {} candidate(s).", discarded);
    }
    Ok(())
}

fn confirm(prompt: &str) -> std::io::Result<bool> {
    print!("{}", prompt);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(!matches!(answer.trim().to_lowercase().as_str(), "n" | "no"))
}

fn remember_folder(config: &mut config::Config, path: &Path) {
    let folder = if path.is_dir() { Some(path) } else { path.parent() };
    let Some(folder) = folder else {
        return;
    };
    config.library.last_folder = Some(folder.to_path_buf());
    if let Err(e) = config::save(config) {
        tracing::warn!("Could not remember the folder: {}", e);
    }
}

fn print_stats(summary: &SearchSummary, saved: Option<&SaveReport>) {
    println!();
    if summary.cancelled {
        println!("Search cancelled.");
    }
    if summary.error.is_some() {
        println!("Search stopped after an error.");
    }
    println!(
        "Done! {} found, {} not found, {} skipped",
        summary.found, summary.not_found, summary.skipped
    );
    if let Some(report) = saved {
        println!("{} saved, {} not saved", report.saved, report.failed.len());
        for (path, error) in &report.failed {
            eprintln!("  ✗ {}: {}", path.display(), error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_interrupt_stops_running_search() {
        let cancel = CancelFlag::new();
        assert_eq!(interrupt_action(true, &cancel), Interrupt::StopSearch);
    }

    #[test]
    fn test_second_interrupt_exits() {
        let cancel = CancelFlag::new();
        cancel.cancel();
        assert_eq!(interrupt_action(true, &cancel), Interrupt::Exit);
    }

    #[test]
    fn test_interrupt_after_search_exits() {
        // Review prompts and saving come after the search
        let cancel = CancelFlag::new();
        assert_eq!(interrupt_action(false, &cancel), Interrupt::Exit);
    }
}
