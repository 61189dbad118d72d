//! Genius API integration
//!
//! Song search goes through the authenticated web API; lyrics are read from
//! the public song page because the API does not return them.
//!
//! API docs: https://docs.genius.com

mod adapter;
mod client;
pub mod dto;

pub use adapter::{extract_lyrics, to_candidates};
pub use client::GeniusClient;
