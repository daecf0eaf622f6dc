//! Catalog search query construction.
//!
//! Queries use the catalog's field filters (`track:"..."`, `artist:"..."`,
//! `album:"..."`) joined by `+`. Quoting keeps multi-word values together.
//! Year and genre are never part of a query.

use bitflags::bitflags;

use super::domain::SourceTrack;

bitflags! {
    /// Set of attributes to leave out of a query
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct QueryAttributes: u8 {
        const TITLE = 0b001;
        const ARTIST = 0b010;
        const ALBUM = 0b100;
    }
}

impl QueryAttributes {
    /// Exclusions for the second search pass: title only
    pub const RELAXED: QueryAttributes = QueryAttributes::ALBUM.union(QueryAttributes::ARTIST);
}

/// Conjunction between field clauses
const JOIN_TOKEN: &str = "+";

/// Build a search query for `track`, skipping the `excluded` attributes.
///
/// Returns an empty string when every attribute is excluded or absent.
/// An empty query is not an error; the search simply finds nothing.
pub fn build_query(track: &SourceTrack, excluded: QueryAttributes) -> String {
    let fields = [
        (QueryAttributes::TITLE, "track", Some(track.title())),
        (QueryAttributes::ARTIST, "artist", Some(track.artist())),
        (QueryAttributes::ALBUM, "album", track.album()),
    ];

    fields
        .into_iter()
        .filter(|(flag, _, _)| !excluded.contains(*flag))
        .filter_map(|(_, field, value)| value.map(|v| clause(field, v)))
        .collect::<Vec<_>>()
        .join(JOIN_TOKEN)
}

fn clause(field: &str, value: &str) -> String {
    // Embedded quotes would end the clause early
    format!("{}:\"{}\"", field, value.replace('"', ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dark_side_track() -> SourceTrack {
        SourceTrack::new("Any Colour You Like", "Pink Floyd")
            .unwrap()
            .with_album("The Dark Side of the Moon")
            .with_year("1973")
    }

    #[test]
    fn test_full_query() {
        let query = build_query(&dark_side_track(), QueryAttributes::empty());
        assert_eq!(
            query,
            "track:\"Any Colour You Like\"+artist:\"Pink Floyd\"+album:\"The Dark Side of the Moon\""
        );
    }

    #[test]
    fn test_relaxed_query_keeps_title_only() {
        let query = build_query(&dark_side_track(), QueryAttributes::RELAXED);
        assert_eq!(query, "track:\"Any Colour You Like\"");
    }

    #[test]
    fn test_missing_album_is_skipped() {
        let track = SourceTrack::new("Time", "Pink Floyd").unwrap();
        let query = build_query(&track, QueryAttributes::empty());
        assert_eq!(query, "track:\"Time\"+artist:\"Pink Floyd\"");
    }

    #[test]
    fn test_everything_excluded_gives_empty_query() {
        let query = build_query(&dark_side_track(), QueryAttributes::all());
        assert!(query.is_empty());
    }

    #[test]
    fn test_year_never_in_query() {
        let query = build_query(&dark_side_track(), QueryAttributes::empty());
        assert!(!query.contains("1973"));
    }

    #[test]
    fn test_quotes_stripped_from_values() {
        let track = SourceTrack::new("The \"Hero\"", "Someone").unwrap();
        let query = build_query(&track, QueryAttributes::RELAXED);
        assert_eq!(query, "track:\"The Hero\"");
    }
}
