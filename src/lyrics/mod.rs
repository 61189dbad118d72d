//! Lyrics acquisition pipeline - finds, checks and formats lyrics for tracks.
//!
//! # Architecture
//!
//! This module follows a clean separation between:
//! - **Domain models** (`domain.rs`) - Internal types that represent our business logic
//! - **Heuristics** (`artists.rs`, `validator.rs`, `formatter.rs`) - Pure functions
//!   that build queries and reject or normalize candidate lyrics
//! - **Provider trait** (`traits.rs`) - The contract of the remote catalog
//! - **Genius** (`genius/`) - DTOs, adapters and HTTP client for the catalog
//! - **Resolver** - Resolves a single track against the catalog
//! - **Worker** - Runs the resolver over a batch on a background thread
//!
//! # Usage
//!
//! ```ignore
//! use lyrics::{AccessToken, GeniusClient, SearchOptions, spawn_search};
//!
//! let token = AccessToken::parse(&raw_token)?;
//! let client = GeniusClient::new(token)?;
//! let handle = spawn_search(client, tracks, SearchOptions::default())?;
//! ```

pub mod artists;
pub mod domain;
pub mod formatter;
pub mod genius;
pub mod resolver;
pub mod traits;
pub mod validator;
pub mod worker;

pub use domain::{AccessToken, CandidateRef, DiscardLyrics, LyricsError, SongLyrics};
pub use genius::GeniusClient;
pub use resolver::{MAX_SEARCH_INDEX, MatchResolver, Resolution};
pub use traits::LyricsProvider;
pub use worker::{
    CancelFlag, SearchEvent, SearchHandle, SearchOptions, SearchSummary, SearchWorker, SkipReason,
    spawn_search,
};
