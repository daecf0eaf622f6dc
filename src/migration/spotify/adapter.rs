//! Adapter layer: Convert Spotify DTOs to domain models
//!
//! This is the ONLY place where Spotify DTO types are converted to domain types.
//! If the Web API changes its response format, only this file and dto.rs
//! need to change.

use super::dto;
use crate::migration::domain::{AlbumImage, CandidateTrack, MigrationError};
use crate::migration::traits::SearchPage;

/// Convert a search response into a page of raw results.
///
/// A response without a `tracks` section is treated as an empty page.
pub fn to_search_page(response: dto::SearchResponse) -> SearchPage {
    let page = response.tracks.unwrap_or_default();
    let returned = page.items.len();
    let items: Vec<_> = page.items.into_iter().flatten().collect();

    if items.len() < returned {
        tracing::debug!("Dropped {} null search results", returned - items.len());
    }

    SearchPage {
        total: page.total,
        items,
    }
}

/// Convert one search result into a candidate track.
///
/// Fails with `MalformedRecord` when the title, primary artist or uri is missing.
/// The primary artist is taken to be the first credited artist.
pub fn to_candidate(track: dto::TrackObject) -> Result<CandidateTrack, MigrationError> {
    let artist = track
        .artists
        .into_iter()
        .next()
        .and_then(|a| a.name)
        .unwrap_or_default();

    let mut candidate = CandidateTrack::new(
        track.name.unwrap_or_default(),
        artist,
        track.uri.unwrap_or_default(),
    )?;

    if let Some(album) = track.album {
        if let Some(year) = album.release_date.as_deref().and_then(release_year) {
            candidate = candidate.with_year(year);
        }
        if let Some(name) = album.name {
            candidate = candidate.with_album(name);
        }
        candidate = candidate.with_album_art(album.images.into_iter().filter_map(to_image).collect());
    }

    Ok(candidate)
}

/// Extract the track ID from a `spotify:track:<id>` URI
pub fn track_id(uri: &str) -> &str {
    uri.rsplit(':').next().unwrap_or(uri)
}

/// First four characters of a release date (YYYY, YYYY-MM, or YYYY-MM-DD)
fn release_year(date: &str) -> Option<String> {
    let year: String = date.chars().take(4).collect();
    if year.is_empty() { None } else { Some(year) }
}

/// Images without a url are dropped
fn to_image(image: dto::ImageObject) -> Option<AlbumImage> {
    Some(AlbumImage {
        url: image.url?,
        height: image.height,
        width: image.width,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::domain::RecordKind;
    use crate::test_utils::{dark_side_search_item, track_object};

    #[test]
    fn test_convert_full_result() {
        let candidate = to_candidate(dark_side_search_item()).unwrap();

        assert_eq!(candidate.title(), "Any Colour You Like - 2011 Remastered Version");
        assert_eq!(candidate.artist(), "Pink Floyd");
        assert_eq!(
            candidate.album(),
            Some("The Dark Side Of The Moon [Remastered] (Remastered Version)")
        );
        assert_eq!(candidate.uri(), "spotify:track:1wGoqD0vrf7njGvxm8CEf5");
        assert_eq!(candidate.year(), Some("1973"));
        assert_eq!(candidate.album_art().len(), 1);
        assert_eq!(candidate.score(), None);
    }

    #[test]
    fn test_primary_artist_is_first_credit() {
        let mut track = track_object("Under Pressure", "Queen", "spotify:track:up");
        track.artists.push(dto::ArtistObject {
            name: Some("David Bowie".to_string()),
            ..Default::default()
        });

        let candidate = to_candidate(track).unwrap();
        assert_eq!(candidate.artist(), "Queen");
    }

    #[test]
    fn test_missing_title_is_malformed() {
        let mut track = track_object("x", "Queen", "spotify:track:x");
        track.name = None;

        let err = to_candidate(track).unwrap_err();
        assert_eq!(
            err,
            MigrationError::MalformedRecord {
                kind: RecordKind::Candidate,
                field: "title"
            }
        );
    }

    #[test]
    fn test_missing_artist_is_malformed() {
        let mut track = track_object("Time", "x", "spotify:track:x");
        track.artists.clear();

        let err = to_candidate(track).unwrap_err();
        assert!(matches!(err, MigrationError::MalformedRecord { field: "artist", .. }));
    }

    #[test]
    fn test_missing_uri_is_malformed() {
        let mut track = track_object("Time", "Pink Floyd", "x");
        track.uri = None;

        let err = to_candidate(track).unwrap_err();
        assert!(matches!(err, MigrationError::MalformedRecord { field: "uri", .. }));
    }

    #[test]
    fn test_year_only_release_date() {
        let mut track = track_object("Time", "Pink Floyd", "spotify:track:t");
        track.album = Some(dto::AlbumObject {
            name: Some("Live".to_string()),
            release_date: Some("1988".to_string()),
            release_date_precision: Some("year".to_string()),
            ..Default::default()
        });

        let candidate = to_candidate(track).unwrap();
        assert_eq!(candidate.year(), Some("1988"));
    }

    #[test]
    fn test_missing_album_is_allowed() {
        let candidate = to_candidate(track_object("Time", "Pink Floyd", "spotify:track:t")).unwrap();
        assert_eq!(candidate.album(), None);
        assert_eq!(candidate.year(), None);
        assert!(candidate.album_art().is_empty());
    }

    #[test]
    fn test_search_page_drops_nulls() {
        let response = dto::SearchResponse {
            tracks: Some(dto::TrackPage {
                total: 2,
                items: vec![None, Some(track_object("Time", "Pink Floyd", "spotify:track:t"))],
                ..Default::default()
            }),
        };

        let page = to_search_page(response);
        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn test_sparse_item_does_not_hide_good_one() {
        let json = r#"{"tracks": {"total": 3, "items": [
            {"name": "Breathe", "artists": null, "album": {"images": null}},
            {"name": "Time", "artists": [{"name": "Pink Floyd"}], "uri": "spotify:track:time",
             "album": {"name": "The Dark Side of the Moon",
                       "images": [{"height": 64}, {"url": "https://i.scdn.co/image/a", "height": 640}]}},
            null
        ]}}"#;
        let response: dto::SearchResponse = serde_json::from_str(json).unwrap();

        let page = to_search_page(response);
        assert_eq!(page.items.len(), 2);

        let mut results = page.items.into_iter().map(to_candidate);
        assert!(matches!(
            results.next(),
            Some(Err(MigrationError::MalformedRecord { field: "artist", .. }))
        ));

        let time = results.next().unwrap().unwrap();
        assert_eq!(time.title(), "Time");
        assert_eq!(time.uri(), "spotify:track:time");
        assert_eq!(time.album_art().len(), 1);
        assert_eq!(time.album_art()[0].url, "https://i.scdn.co/image/a");
    }

    #[test]
    fn test_search_page_without_tracks_section() {
        let page = to_search_page(dto::SearchResponse { tracks: None });
        assert!(page.is_empty());
    }

    #[test]
    fn test_track_id_from_uri() {
        assert_eq!(track_id("spotify:track:1wGoqD0vrf7njGvxm8CEf5"), "1wGoqD0vrf7njGvxm8CEf5");
        assert_eq!(track_id("plainid"), "plainid");
    }
}
