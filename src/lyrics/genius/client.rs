//! Genius HTTP client
//!
//! Handles communication with the Genius web API and song pages.
//! See: https://docs.genius.com
//!
//! Every API request carries the client access token as a bearer token.
//! Song pages are public and fetched without it.

use std::time::Duration;

use super::{adapter, dto};
use crate::lyrics::domain::{AccessToken, CandidateRef, LyricsError, SongLyrics};

/// Timeout applied to every request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Genius API client
pub struct GeniusClient {
    token: AccessToken,
    http_client: reqwest::Client,
    base_url: String,
}

impl GeniusClient {
    /// Create a new client for a validated token
    pub fn new(token: AccessToken) -> Result<Self, LyricsError> {
        Self::with_base_url(token, "https://api.genius.com")
    }

    /// Create a client talking to a custom API root
    pub fn with_base_url(
        token: AccessToken,
        base_url: impl Into<String>,
    ) -> Result<Self, LyricsError> {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| LyricsError::Network(e.to_string()))?;

        Ok(Self {
            token,
            http_client,
            base_url: base_url.into(),
        })
    }

    /// Search songs matching `query`, best match first
    pub async fn search(&self, query: &str) -> Result<Vec<CandidateRef>, LyricsError> {
        let url = format!("{}/search?q={}", self.base_url, urlencoding::encode(query));
        let response = self.send_api_request(&url).await?;

        let body = response
            .json::<dto::SearchResponse>()
            .await
            .map_err(|e| LyricsError::Parse(e.to_string()))?;
        adapter::to_candidates(body)
    }

    /// Fetch the lyrics of a song: resolve its page, then read the page
    pub async fn fetch_lyrics(&self, song_id: u64) -> Result<SongLyrics, LyricsError> {
        let url = format!("{}/songs/{}", self.base_url, song_id);
        let response = self.send_api_request(&url).await?;

        let body = response
            .json::<dto::SongResponse>()
            .await
            .map_err(|e| LyricsError::Parse(e.to_string()))?;
        let song = body
            .response
            .map(|b| b.song)
            .ok_or_else(|| LyricsError::Api(format!("song {} missing from response", song_id)))?;
        let candidate = adapter::to_candidate(song);
        let page_url = candidate
            .url
            .ok_or_else(|| LyricsError::Api(format!("song {} has no page", song_id)))?;

        let page = self
            .http_client
            .get(&page_url)
            .send()
            .await
            .map_err(|e| LyricsError::Network(e.to_string()))?;
        let page = check_status(page).await?;
        let html = page
            .text()
            .await
            .map_err(|e| LyricsError::Network(e.to_string()))?;

        adapter::extract_lyrics(&html, &candidate.artist_name)
    }

    async fn send_api_request(&self, url: &str) -> Result<reqwest::Response, LyricsError> {
        let response = self
            .http_client
            .get(url)
            .bearer_auth(self.token.as_str())
            .send()
            .await
            .map_err(|e| LyricsError::Network(e.to_string()))?;

        check_status(response).await
    }
}

/// Map HTTP failures to lyrics errors
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LyricsError> {
    let status = response.status();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        let reason = match response.json::<dto::AuthError>().await {
            Ok(error) => error.error_description.unwrap_or(error.error),
            Err(_) => "rejected by the service".to_string(),
        };
        return Err(LyricsError::InvalidToken(reason));
    }

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(LyricsError::RateLimited);
    }

    if !status.is_success() {
        return Err(LyricsError::Network(format!(
            "HTTP {}: {}",
            status,
            status.canonical_reason().unwrap_or("Unknown")
        )));
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> AccessToken {
        AccessToken::parse(&"a".repeat(64)).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = GeniusClient::new(token()).unwrap();
        assert_eq!(client.base_url, "https://api.genius.com");
    }

    #[test]
    fn test_client_with_custom_url() {
        let client = GeniusClient::with_base_url(token(), "http://localhost:8080").unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let client = GeniusClient::with_base_url(token(), "http://127.0.0.1:9").unwrap();
        let result = client.search("anything").await;
        assert!(matches!(result, Err(LyricsError::Network(_))));
    }
}
