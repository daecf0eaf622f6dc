//! Adapter layer: Convert source library DTOs to domain models

use super::dto;
use crate::migration::domain::{MigrationError, SourceTrack};

/// Convert an exported song into a source track.
///
/// Fails with `MalformedRecord` when the title or artist is missing.
pub fn to_source_track(raw: dto::RawTrack) -> Result<SourceTrack, MigrationError> {
    let mut track = SourceTrack::new(
        raw.title.unwrap_or_default(),
        raw.artist.unwrap_or_default(),
    )?;

    if let Some(album) = raw.album {
        track = track.with_album(album);
    }
    if let Some(year) = raw.year.and_then(year_string) {
        track = track.with_year(year);
    }
    if let Some(genre) = raw.genre {
        track = track.with_genre(genre);
    }

    Ok(track)
}

/// Exports use 0 for an unknown year
fn year_string(year: dto::YearValue) -> Option<String> {
    match year {
        dto::YearValue::Number(n) if n > 0 => Some(n.to_string()),
        dto::YearValue::Number(_) => None,
        dto::YearValue::Text(s) => Some(s.trim().to_string()),
    }
}
