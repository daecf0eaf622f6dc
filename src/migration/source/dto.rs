//! Source library export Data Transfer Objects
//!
//! The export is the JSON dump of the source service's song list: either a
//! bare array of songs or an object with a `tracks` array. Songs carry more
//! fields than we use; unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// Top-level shape of an export file
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LibraryExportFile {
    Tracks(Vec<RawTrack>),
    Wrapped { tracks: Vec<RawTrack> },
}

impl LibraryExportFile {
    pub fn into_tracks(self) -> Vec<RawTrack> {
        match self {
            LibraryExportFile::Tracks(tracks) => tracks,
            LibraryExportFile::Wrapped { tracks } => tracks,
        }
    }
}

/// One song as exported by the source service
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawTrack {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Numeric in most exports, occasionally a string
    pub year: Option<YearValue>,
    pub genre: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum YearValue {
    Number(i64),
    Text(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_array() {
        let json = r#"[
            {"title": "Blue Orchid", "artist": "The White Stripes", "album": "Get Behind Me Satan", "year": 2005, "durationMillis": "157000"}
        ]"#;

        let file: LibraryExportFile = serde_json::from_str(json).expect("Should parse array");
        let tracks = file.into_tracks();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title.as_deref(), Some("Blue Orchid"));
        assert_eq!(tracks[0].year, Some(YearValue::Number(2005)));
    }

    #[test]
    fn test_parse_wrapped_object() {
        let json = r#"{"tracks": [{"title": "Seven Nation Army", "artist": "The White Stripes", "year": "2003", "genre": "Rock"}]}"#;

        let file: LibraryExportFile = serde_json::from_str(json).expect("Should parse object");
        let tracks = file.into_tracks();
        assert_eq!(tracks[0].year, Some(YearValue::Text("2003".to_string())));
        assert_eq!(tracks[0].genre.as_deref(), Some("Rock"));
    }

    /// Missing mandatory fields still parse; the adapter rejects them
    #[test]
    fn test_parse_sparse_track() {
        let json = r#"[{"album": "Test Album", "year": 1234}]"#;
        let tracks = serde_json::from_str::<LibraryExportFile>(json)
            .unwrap()
            .into_tracks();
        assert!(tracks[0].title.is_none());
        assert!(tracks[0].artist.is_none());
    }
}
