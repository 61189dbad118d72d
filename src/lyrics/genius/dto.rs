//! Genius API Data Transfer Objects
//!
//! These types match what the Genius API returns, limited to the fields we
//! read. Convert them to domain types through the adapter.
//!
//! Example search response:
//! ```json
//! {
//!   "meta": { "status": 200 },
//!   "response": {
//!     "hits": [{
//!       "type": "song",
//!       "result": {
//!         "id": 378195,
//!         "title": "Bohemian Rhapsody",
//!         "url": "https://genius.com/Queen-bohemian-rhapsody-lyrics",
//!         "primary_artist": { "id": 563, "name": "Queen" }
//!       }
//!     }]
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Response status block present on every API response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Meta {
    pub status: u16,
    pub message: Option<String>,
}

/// `GET /search?q=`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    pub meta: Meta,
    pub response: Option<SearchBody>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchBody {
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// A search hit; only `"song"` hits are useful
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Hit {
    #[serde(rename = "type")]
    pub hit_type: String,
    pub result: Song,
}

/// `GET /songs/{id}`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SongResponse {
    pub meta: Meta,
    pub response: Option<SongBody>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SongBody {
    pub song: Song,
}

/// Song as returned by both endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Song {
    pub id: u64,
    pub title: String,
    pub url: Option<String>,
    pub primary_artist: Option<Artist>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Artist {
    pub name: String,
}

/// OAuth-style error body returned for authentication failures
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthError {
    pub error: String,
    pub error_description: Option<String>,
}
