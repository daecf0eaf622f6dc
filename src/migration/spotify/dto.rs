//! Spotify Web API Data Transfer Objects
//!
//! These types match what the Spotify Web API returns.
//! DO NOT use these types outside the migration module - convert to domain types.
//!
//! API Reference: https://developer.spotify.com/documentation/web-api
//!
//! Nearly every field is optional here: the adapter decides which ones are
//! mandatory, so a sparse result fails as a malformed candidate instead of
//! failing the whole page.

use serde::{Deserialize, Deserializer, Serialize};

/// Response of `GET /v1/search?type=track`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    /// Present when `track` is among the requested types
    pub tracks: Option<TrackPage>,
}

/// One page of track results
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TrackPage {
    /// Total matches across all pages
    #[serde(default)]
    pub total: u32,
    /// Page size requested
    pub limit: Option<u32>,
    /// Offset of this page
    pub offset: Option<u32>,
    /// URL of the next page
    pub next: Option<String>,
    /// Results; Spotify occasionally returns `null` entries
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<Option<TrackObject>>,
}

/// Full track object
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TrackObject {
    /// Track title
    pub name: Option<String>,
    /// Spotify track ID
    pub id: Option<String>,
    /// Spotify URI (`spotify:track:<id>`)
    pub uri: Option<String>,
    /// Credited artists, primary artist first
    #[serde(default, deserialize_with = "null_as_empty")]
    pub artists: Vec<ArtistObject>,
    /// Album the track appears on
    pub album: Option<AlbumObject>,
    /// Track length in milliseconds
    pub duration_ms: Option<u64>,
    /// Explicit lyrics flag
    pub explicit: Option<bool>,
    /// Popularity (0-100)
    pub popularity: Option<u32>,
}

/// Simplified artist object
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ArtistObject {
    pub name: Option<String>,
    pub id: Option<String>,
    pub uri: Option<String>,
}

/// Simplified album object
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AlbumObject {
    pub name: Option<String>,
    pub id: Option<String>,
    /// Cover art in several sizes, widest first
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<ImageObject>,
    /// Release date (YYYY, YYYY-MM, or YYYY-MM-DD)
    pub release_date: Option<String>,
    /// Precision of `release_date`: year, month or day
    pub release_date_precision: Option<String>,
}

/// Image descriptor
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImageObject {
    pub url: Option<String>,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

/// Error envelope returned with non-2xx responses
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
}

/// Body of `PUT /v1/me/tracks`
#[derive(Debug, Clone, Serialize)]
pub struct SaveTracksRequest {
    pub ids: Vec<String>,
}

/// Treat an explicit `null` list like a missing one
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
