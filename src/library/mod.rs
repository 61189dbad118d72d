//! The working set: tracks loaded for tagging and the runs acting on them.
//!
//! [`WorkingSet`] is the single owner of the [`TrackRecord`]s. A search runs
//! on copies in the background and this coordinator applies the copies it
//! receives, in order, as the only writer. At most one search runs at a time.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::lyrics::{
    LyricsError, LyricsProvider, SearchEvent, SearchHandle, SearchOptions, SearchSummary,
    spawn_search,
};
use crate::metadata::{FileKind, TagStore};
use crate::model::{SaveOutcome, TrackRecord};

/// Result of adding files to the working set.
#[derive(Debug, Default)]
pub struct AddReport {
    pub added: usize,
    /// Files already in the working set
    pub duplicates: usize,
    /// Files whose tags could not be read
    pub errors: Vec<(PathBuf, String)>,
}

/// Result of saving the pending candidates.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub saved: usize,
    pub failed: Vec<(PathBuf, String)>,
}

/// Tracks being tagged plus the state of the current search.
#[derive(Default)]
pub struct WorkingSet {
    tracks: Vec<TrackRecord>,
    search: Option<SearchHandle>,
    /// Paths removed while the current search runs; their updates are stale
    removed_during_search: HashSet<PathBuf>,
    done: usize,
    last_summary: Option<SearchSummary>,
}

impl WorkingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracks(&self) -> &[TrackRecord] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&TrackRecord> {
        self.tracks.get(index)
    }

    pub fn find(&self, path: &Path) -> Option<&TrackRecord> {
        self.tracks.iter().find(|t| t.filepath() == path)
    }

    /// Number of tracks in the set.
    pub fn total(&self) -> usize {
        self.tracks.len()
    }

    /// Tracks updated by the current (or last) search.
    ///
    /// Updates for tracks removed during the run are not counted, so this
    /// never exceeds [`total`](Self::total).
    pub fn done(&self) -> usize {
        self.done
    }

    pub fn is_searching(&self) -> bool {
        self.search.is_some()
    }

    pub fn last_summary(&self) -> Option<&SearchSummary> {
        self.last_summary.as_ref()
    }

    /// Whether any track holds a candidate waiting to be saved.
    pub fn has_pending_lyrics(&self) -> bool {
        self.tracks.iter().any(TrackRecord::has_lyrics_new)
    }

    /// Read the tags of `paths` and append the new tracks.
    ///
    /// Files already present are ignored; unreadable files are reported and
    /// left out.
    pub fn add_files<I>(&mut self, store: &dyn TagStore, paths: I) -> AddReport
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut report = AddReport::default();

        for path in paths {
            if self.find(&path).is_some() {
                report.duplicates += 1;
                continue;
            }
            let Some(kind) = FileKind::from_path(&path) else {
                report.errors.push((path, "unsupported file type".to_string()));
                continue;
            };
            match store.read_tags(&path, kind) {
                Ok(tags) => {
                    self.tracks.push(TrackRecord::from_tags(path, kind, tags));
                    report.added += 1;
                }
                Err(e) => {
                    tracing::warn!(target: "library", path = %path.display(), error = %e, "Could not read tags");
                    report.errors.push((path, e.to_string()));
                }
            }
        }

        tracing::info!(
            target: "library",
            added = report.added,
            duplicates = report.duplicates,
            errors = report.errors.len(),
            "Files added"
        );
        report
    }

    /// Append an already built track, ignoring duplicates by path.
    pub fn push(&mut self, track: TrackRecord) -> bool {
        if self.find(track.filepath()).is_some() {
            return false;
        }
        self.tracks.push(track);
        true
    }

    /// Remove the tracks at `indices`, returning how many were removed.
    ///
    /// Updates still arriving for a removed track are dropped, even when a
    /// file with the same path is added again during the run.
    pub fn remove(&mut self, indices: &[usize]) -> usize {
        let searching = self.is_searching();
        let before = self.tracks.len();
        let mut removed = Vec::new();
        let mut position = 0;
        self.tracks.retain(|track| {
            let keep = !indices.contains(&position);
            position += 1;
            if !keep && searching {
                removed.push(track.filepath().to_path_buf());
            }
            keep
        });
        self.removed_during_search.extend(removed);
        before - self.tracks.len()
    }

    /// Remove every track.
    pub fn clear(&mut self) -> Result<(), LyricsError> {
        self.ensure_idle()?;
        self.tracks.clear();
        self.done = 0;
        Ok(())
    }

    /// Start searching lyrics for the whole set in the background.
    pub fn start_search<P>(&mut self, provider: P, options: SearchOptions) -> crate::error::Result<()>
    where
        P: LyricsProvider + 'static,
    {
        self.ensure_idle()?;
        let handle = spawn_search(provider, self.tracks.clone(), options)?;
        self.removed_during_search.clear();
        self.done = 0;
        self.last_summary = None;
        self.search = Some(handle);
        Ok(())
    }

    /// Ask the running search to stop before its next track.
    pub fn cancel_search(&self) {
        if let Some(ref handle) = self.search {
            tracing::info!(target: "library", "Cancelling search");
            handle.cancel();
        }
    }

    /// The running search's cancel flag, for signal handlers.
    pub fn cancel_flag(&self) -> Option<crate::lyrics::CancelFlag> {
        self.search.as_ref().map(|h| h.cancel_flag().clone())
    }

    /// Apply the events already available without blocking.
    ///
    /// Returns the summary once the search has finished.
    pub fn poll(&mut self) -> Option<SearchSummary> {
        loop {
            let event = self.search.as_ref()?.events().try_recv().ok()?;
            if let Some(summary) = self.apply(event) {
                return Some(summary);
            }
        }
    }

    /// Apply events until the search finishes, calling `on_progress` with
    /// [`done`](Self::done) and each track actually updated.
    ///
    /// Returns `None` when no search was running.
    pub fn wait<F>(&mut self, mut on_progress: F) -> Option<SearchSummary>
    where
        F: FnMut(usize, &TrackRecord),
    {
        loop {
            let event = match self.search.as_ref()?.events().recv() {
                Ok(event) => event,
                Err(_) => {
                    // Worker gone without a summary
                    tracing::error!(target: "library", "Search ended unexpectedly");
                    self.finish();
                    return self.last_summary.clone();
                }
            };

            match event {
                SearchEvent::Progress { index, track } => {
                    if let Some(updated) = self.apply_progress(index, track) {
                        on_progress(self.done, &self.tracks[updated]);
                    }
                }
                SearchEvent::Finished(summary) => return Some(self.apply_finished(summary)),
            }
        }
    }

    fn apply(&mut self, event: SearchEvent) -> Option<SearchSummary> {
        match event {
            SearchEvent::Progress { index, track } => {
                self.apply_progress(index, track);
                None
            }
            SearchEvent::Finished(summary) => Some(self.apply_finished(summary)),
        }
    }

    /// Replace the matching track, returning its position when applied.
    fn apply_progress(&mut self, index: usize, track: TrackRecord) -> Option<usize> {
        // Match by path: the set may have changed since the run started
        let position = if self.removed_during_search.contains(track.filepath()) {
            None
        } else {
            self.tracks.iter().position(|t| t.filepath() == track.filepath())
        };
        let Some(position) = position else {
            tracing::debug!(target: "library", index, file = %track.filename(), "Dropping update for removed track");
            return None;
        };
        self.tracks[position] = track;
        self.done += 1;
        Some(position)
    }

    fn apply_finished(&mut self, summary: SearchSummary) -> SearchSummary {
        self.last_summary = Some(summary.clone());
        self.finish();
        summary
    }

    fn finish(&mut self) {
        if let Some(handle) = self.search.take() {
            handle.join();
        }
    }

    /// Drop the candidates of the tracks at `indices`, returning how many
    /// tracks had one.
    pub fn discard(&mut self, indices: &[usize]) -> Result<usize, LyricsError> {
        self.ensure_idle()?;
        let mut discarded = 0;
        for &index in indices {
            if let Some(track) = self.tracks.get_mut(index)
                && track.discard_candidate()
            {
                discarded += 1;
            }
        }
        Ok(discarded)
    }

    /// Write every pending candidate to its file.
    ///
    /// A failed write only affects its own track, which keeps its candidate.
    pub fn save_all(&mut self, store: &dyn TagStore) -> Result<SaveReport, LyricsError> {
        self.ensure_idle()?;
        let mut report = SaveReport::default();

        for track in self.tracks.iter_mut().filter(|t| t.has_lyrics_new()) {
            let result = store.write_lyrics(track.filepath(), track.kind(), track.lyrics_new());
            match track.apply_save_result(result) {
                SaveOutcome::Saved => {
                    tracing::info!(target: "library", file = %track.filename(), "Lyrics saved");
                    report.saved += 1;
                }
                SaveOutcome::Failed(reason) => {
                    tracing::error!(target: "library", file = %track.filename(), error = %reason, "Could not save lyrics");
                    report.failed.push((track.filepath().to_path_buf(), reason));
                }
                SaveOutcome::NothingToSave => {}
            }
        }

        Ok(report)
    }

    fn ensure_idle(&self) -> Result<(), LyricsError> {
        if self.is_searching() {
            return Err(LyricsError::SearchInProgress);
        }
        Ok(())
    }
}
