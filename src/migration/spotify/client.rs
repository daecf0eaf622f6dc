//! Spotify Web API HTTP client
//!
//! Handles catalog search and the user's saved-tracks collection.
//! See: https://developer.spotify.com/documentation/web-api
//!
//! The client expects a ready-made OAuth access token with the
//! `user-library-read` and `user-library-modify` scopes. Obtaining and
//! refreshing that token happens outside this crate.
//!
//! ## API Quirks
//!
//! - The search `q` parameter uses field filters such as `track:"..."`.
//!   The query is percent-encoded by hand so the `+` joining clauses is sent
//!   as `%2B` and not decoded into a space by the server.
//! - `PUT /me/tracks` accepts at most 50 IDs per request.

use std::time::Duration;

use super::{adapter, dto};
use crate::migration::domain::MigrationError;
use crate::migration::traits::SearchPage;

/// Maximum number of IDs accepted by one saved-tracks request
pub const SAVE_BATCH_LIMIT: usize = 50;

const DEFAULT_BASE_URL: &str = "https://api.spotify.com/v1";

/// Spotify Web API client
pub struct SpotifyClient {
    http_client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl SpotifyClient {
    /// Create a new client authenticated with `access_token`
    ///
    /// The client is configured to:
    /// - Accept gzip-compressed responses
    /// - Send a User-Agent header identifying the application
    /// - Give up on any single request after `timeout`
    pub fn new(access_token: impl Into<String>, timeout: Duration) -> Result<Self, MigrationError> {
        Self::with_base_url(access_token, DEFAULT_BASE_URL, timeout)
    }

    /// Create a client against a custom base URL (proxies, test servers)
    pub fn with_base_url(
        access_token: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, MigrationError> {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| MigrationError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
            access_token: access_token.into(),
        })
    }

    /// Search the catalog for tracks matching `query`
    pub async fn search(&self, query: &str, limit: u32) -> Result<SearchPage, MigrationError> {
        let url = self.search_url(query, limit);
        tracing::debug!("Searching catalog: {}", query);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| MigrationError::Network(e.to_string()))?;

        let response = check_status(response).await?;

        let body = response
            .json::<dto::SearchResponse>()
            .await
            .map_err(|e| MigrationError::Parse(e.to_string()))?;

        Ok(adapter::to_search_page(body))
    }

    /// Add tracks to the user's saved tracks ("liked songs").
    ///
    /// Callers must keep `uris` within [`SAVE_BATCH_LIMIT`].
    pub async fn save_tracks(&self, uris: &[String]) -> Result<(), MigrationError> {
        if uris.len() > SAVE_BATCH_LIMIT {
            return Err(MigrationError::Api(format!(
                "At most {} tracks can be saved per request, got {}",
                SAVE_BATCH_LIMIT,
                uris.len()
            )));
        }

        let body = dto::SaveTracksRequest {
            ids: uris.iter().map(|uri| adapter::track_id(uri).to_string()).collect(),
        };

        let response = self
            .http_client
            .put(format!("{}/me/tracks", self.base_url))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| MigrationError::Network(e.to_string()))?;

        check_status(response).await?;
        Ok(())
    }

    /// Build the search URL by hand to keep the query encoding under our control
    fn search_url(&self, query: &str, limit: u32) -> String {
        format!(
            "{}/search?q={}&type=track&limit={}",
            self.base_url,
            urlencoding::encode(query),
            limit.clamp(1, 50)
        )
    }
}

/// Map non-success statuses onto domain errors
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, MigrationError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(MigrationError::Unauthorized);
    }

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(MigrationError::RateLimited);
    }

    // Try to parse error response
    let body = response.text().await.unwrap_or_default();
    if let Ok(error) = serde_json::from_str::<dto::ErrorResponse>(&body) {
        return Err(MigrationError::Api(error.error.message));
    }

    Err(MigrationError::Network(format!(
        "HTTP {}: {} - {}",
        status,
        status.canonical_reason().unwrap_or("Unknown"),
        body.chars().take(200).collect::<String>()
    )))
}
