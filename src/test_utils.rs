//! Test utilities and fixtures for music-migrator tests.
//!
//! This module provides common source tracks and catalog search results
//! to reduce boilerplate in tests.
//!
//! # Example
//!
//! ```ignore
//! use music_migrator::test_utils::{dark_side_source, dark_side_search_item};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let catalog = MockCatalog::single_page(vec![dark_side_search_item()]);
//!     let track = dark_side_source();
//!     // ... test logic
//! }
//! ```

use crate::migration::domain::SourceTrack;
use crate::migration::spotify::dto::{AlbumObject, ArtistObject, ImageObject, TrackObject};

/// Creates a source track with only the mandatory fields.
///
/// Add optional fields with the builder methods:
///
/// ```ignore
/// let track = source_track("Money", "Pink Floyd").with_album("The Dark Side of the Moon");
/// ```
pub fn source_track(title: &str, artist: &str) -> SourceTrack {
    SourceTrack::new(title, artist).expect("fixture title and artist must be non-empty")
}

/// Creates a source track with every field set.
pub fn mock_source_track() -> SourceTrack {
    source_track("Test Title", "Test Artist")
        .with_album("Test Album")
        .with_year("1234")
        .with_genre("Rock")
}

/// The library copy of "Any Colour You Like".
pub fn dark_side_source() -> SourceTrack {
    source_track("Any Colour You Like", "Pink Floyd")
        .with_album("The Dark Side of the Moon")
        .with_year("1973")
}

/// A minimal search result with a title, one artist and a uri.
///
/// Fields are public, so tests knock out whatever they need missing:
///
/// ```ignore
/// let mut broken = track_object("Time", "Pink Floyd", "spotify:track:x");
/// broken.uri = None;
/// ```
pub fn track_object(name: &str, artist: &str, uri: &str) -> TrackObject {
    TrackObject {
        name: Some(name.to_string()),
        id: uri.rsplit(':').next().map(str::to_string),
        uri: Some(uri.to_string()),
        artists: vec![ArtistObject {
            name: Some(artist.to_string()),
            ..Default::default()
        }],
        ..Default::default()
    }
}

/// The catalog's remastered "Any Colour You Like", as search returns it.
pub fn dark_side_search_item() -> TrackObject {
    TrackObject {
        album: Some(AlbumObject {
            name: Some("The Dark Side Of The Moon [Remastered] (Remastered Version)".to_string()),
            id: Some("4LH4d3cOWNNsVw41Gqt2kv".to_string()),
            images: vec![ImageObject {
                url: Some("https://i.scdn.co/image/ab67616d0000b273ea7caaff71dea1051d49b2fe".to_string()),
                height: Some(640),
                width: Some(640),
            }],
            release_date: Some("1973-01-01".to_string()),
            release_date_precision: Some("day".to_string()),
        }),
        duration_ms: Some(205_733),
        popularity: Some(62),
        ..track_object(
            "Any Colour You Like - 2011 Remastered Version",
            "Pink Floyd",
            "spotify:track:1wGoqD0vrf7njGvxm8CEf5",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_source_track_defaults() {
        let track = mock_source_track();
        assert_eq!(track.title(), "Test Title");
        assert_eq!(track.album(), Some("Test Album"));
        assert_eq!(track.year(), Some("1234"));
    }

    #[test]
    fn test_track_object_sets_id_from_uri() {
        let track = track_object("Time", "Pink Floyd", "spotify:track:abc");
        assert_eq!(track.id.as_deref(), Some("abc"));
        assert_eq!(track.artists.len(), 1);
    }
}
