//! Background search worker.
//!
//! Runs the [`MatchResolver`] over a list of tracks, strictly in order and one
//! track at a time, and reports every track exactly once.
//!
//! # Design
//!
//! - **One thread per run**: [`spawn_search`] starts a named thread driving
//!   its own single-threaded tokio runtime, so remote calls never block the
//!   caller
//! - **Message passing**: progress and completion travel over a bounded
//!   channel as [`SearchEvent`]s, in input order
//! - **Cooperative cancellation**: the [`CancelFlag`] is checked between
//!   tracks; an in-flight request is never interrupted
//! - **Fatal errors stop the run**: once the service rejects the token, the
//!   remaining tracks are skipped and the error is kept in the summary
//!
//! # Usage
//!
//! ```rust,ignore
//! let handle = spawn_search(client, tracks, SearchOptions::default())?;
//!
//! while let Ok(event) = handle.events().recv() {
//!     match event {
//!         SearchEvent::Progress { index, track } => println!("{}: {}", index, track.state()),
//!         SearchEvent::Finished(summary) => break,
//!     }
//! }
//! ```

use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use super::domain::LyricsError;
use super::resolver::{MAX_SEARCH_INDEX, MatchResolver, Resolution};
use super::traits::LyricsProvider;
use crate::model::TrackRecord;

/// Capacity of the event channel between the worker and the coordinator.
const EVENT_BUFFER: usize = 64;

/// Shared flag asking a running search to stop.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the worker to stop before the next track.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Settings for one search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Search tracks whose file already stores lyrics
    pub overwrite_existing: bool,
    /// Candidates tried per track
    pub max_candidates: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            overwrite_existing: false,
            max_candidates: MAX_SEARCH_INDEX,
        }
    }
}

/// Why a track was not searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Cancelled,
    /// An earlier track hit an error no later request can recover from
    Aborted,
    /// The file already has lyrics and overwriting is off
    HasOriginalLyrics,
    /// A previous run already produced a candidate
    HasCandidate,
}

/// Statistics of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSummary {
    /// Tracks handed to the resolver
    pub searched: usize,
    pub found: usize,
    pub not_found: usize,
    /// Tracks reported without a search, cancellation included
    pub skipped: usize,
    /// Whether the run was cancelled before the last track
    pub cancelled: bool,
    /// Error that stopped the run early
    pub error: Option<LyricsError>,
}

impl SearchSummary {
    /// Number of tracks reported.
    pub fn total(&self) -> usize {
        self.searched + self.skipped
    }
}

/// Message from a running search.
#[derive(Debug, Clone)]
pub enum SearchEvent {
    /// A track was processed or skipped; `index` is its position in the input
    Progress { index: usize, track: TrackRecord },
    /// Sent once, after the last progress event
    Finished(SearchSummary),
}

/// Drives the resolver over a list of tracks.
pub struct SearchWorker<P> {
    resolver: MatchResolver<P>,
    overwrite_existing: bool,
}

impl<P: LyricsProvider> SearchWorker<P> {
    pub fn new(provider: P, options: SearchOptions) -> Self {
        Self {
            resolver: MatchResolver::with_max_candidates(provider, options.max_candidates),
            overwrite_existing: options.overwrite_existing,
        }
    }

    /// Decide whether a track is searched, checked at the top of each iteration.
    pub fn skip_reason(&self, track: &TrackRecord, cancel: &CancelFlag) -> Option<SkipReason> {
        if cancel.is_cancelled() {
            Some(SkipReason::Cancelled)
        } else if !self.overwrite_existing && track.has_lyrics_original() {
            Some(SkipReason::HasOriginalLyrics)
        } else if track.has_lyrics_new() {
            Some(SkipReason::HasCandidate)
        } else {
            None
        }
    }

    /// Process `tracks` in order, calling `on_progress` exactly once per track.
    pub async fn run<F>(
        &self,
        tracks: &mut [TrackRecord],
        cancel: &CancelFlag,
        mut on_progress: F,
    ) -> SearchSummary
    where
        F: FnMut(usize, &TrackRecord),
    {
        let mut summary = SearchSummary::default();
        let count = tracks.len();

        for (index, track) in tracks.iter_mut().enumerate() {
            let skip = if summary.error.is_some() {
                Some(SkipReason::Aborted)
            } else {
                self.skip_reason(track, cancel)
            };
            match skip {
                Some(reason) => {
                    if reason == SkipReason::Cancelled && !summary.cancelled {
                        tracing::info!(target: "lyrics::worker", remaining = count - index, "Search cancelled");
                        summary.cancelled = true;
                    }
                    tracing::debug!(target: "lyrics::worker", file = %track.filename(), ?reason, "Skipped");
                    summary.skipped += 1;
                }
                None => {
                    summary.searched += 1;
                    match self.resolver.resolve(track).await {
                        Resolution::Found(_) => summary.found += 1,
                        Resolution::NotFound => summary.not_found += 1,
                        Resolution::Aborted(e) => {
                            tracing::error!(target: "lyrics::worker", remaining = count - index - 1, error = %e, "Search stopped");
                            summary.not_found += 1;
                            summary.error = Some(e);
                        }
                    }
                }
            }
            on_progress(index, track);
        }

        tracing::info!(
            target: "lyrics::worker",
            searched = summary.searched,
            found = summary.found,
            not_found = summary.not_found,
            skipped = summary.skipped,
            "Search finished"
        );
        summary
    }
}

/// Handle to a search running on its own thread.
pub struct SearchHandle {
    events: Receiver<SearchEvent>,
    cancel: CancelFlag,
    total: usize,
    thread: Option<JoinHandle<()>>,
}

impl SearchHandle {
    /// Ordered progress and completion events.
    pub fn events(&self) -> &Receiver<SearchEvent> {
        &self.events
    }

    /// Flag stopping the run before its next track.
    pub fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Number of tracks the run will report.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Wait for the worker thread to exit.
    pub fn join(mut self) {
        self.join_thread();
    }

    fn join_thread(&mut self) {
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            tracing::error!(target: "lyrics::worker", "Search thread panicked");
        }
    }
}

impl Drop for SearchHandle {
    fn drop(&mut self) {
        // Stop at the next track; the thread exits once the run ends
        self.cancel.cancel();
    }
}

/// Start a search over `tracks` on a dedicated thread.
///
/// The tracks are searched as copies; the caller applies the copies carried
/// by [`SearchEvent::Progress`].
pub fn spawn_search<P>(
    provider: P,
    mut tracks: Vec<TrackRecord>,
    options: SearchOptions,
) -> crate::error::Result<SearchHandle>
where
    P: LyricsProvider + 'static,
{
    let (tx, rx) = bounded(EVENT_BUFFER);
    let cancel = CancelFlag::new();
    let worker_cancel = cancel.clone();
    let total = tracks.len();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let thread = std::thread::Builder::new()
        .name("lyrics-search".into())
        .spawn(move || {
            let worker = SearchWorker::new(provider, options);
            let summary = runtime.block_on(worker.run(&mut tracks, &worker_cancel, |index, track| {
                send(
                    &tx,
                    SearchEvent::Progress {
                        index,
                        track: track.clone(),
                    },
                );
            }));
            send(&tx, SearchEvent::Finished(summary));
        })?;

    tracing::info!(target: "lyrics::worker", tracks = total, "Search started");
    Ok(SearchHandle {
        events: rx,
        cancel,
        total,
        thread: Some(thread),
    })
}

fn send(tx: &Sender<SearchEvent>, event: SearchEvent) {
    if tx.send(event).is_err() {
        tracing::debug!(target: "lyrics::worker", "Event receiver dropped");
    }
}
