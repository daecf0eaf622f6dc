//! Internal domain models for library migration.
//!
//! These types are OUR types - they don't change when a catalog API changes.
//! Raw records from either service get converted into these types via adapters,
//! and the mandatory-field invariants are checked once, at construction.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which side of the migration a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// A track read from the source library
    Source,
    /// A search result from the destination catalog
    Candidate,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Source => write!(f, "source"),
            RecordKind::Candidate => write!(f, "candidate"),
        }
    }
}

/// Track attributes that can be compared between catalogs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Title,
    Artist,
    Album,
    Year,
    Genre,
}

impl Attribute {
    /// Attributes that carry comparable text. Year is metadata only.
    pub const SCORED: [Attribute; 4] = [
        Attribute::Title,
        Attribute::Artist,
        Attribute::Album,
        Attribute::Genre,
    ];
}

/// A track from the source library.
///
/// Title and artist are guaranteed non-empty; construction fails otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SourceTrackFields")]
pub struct SourceTrack {
    title: String,
    artist: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    album: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    genre: Option<String>,
}

impl SourceTrack {
    /// Create a source track, rejecting blank title or artist
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
    ) -> Result<Self, MigrationError> {
        Ok(Self {
            title: required(title.into(), RecordKind::Source, "title")?,
            artist: required(artist.into(), RecordKind::Source, "artist")?,
            album: None,
            year: None,
            genre: None,
        })
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = optional(album.into());
        self
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = optional(year.into());
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = optional(genre.into());
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn album(&self) -> Option<&str> {
        self.album.as_deref()
    }

    pub fn year(&self) -> Option<&str> {
        self.year.as_deref()
    }

    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref()
    }

    /// Look up an attribute by name, `None` when absent
    pub fn attribute(&self, attribute: Attribute) -> Option<&str> {
        match attribute {
            Attribute::Title => Some(&self.title),
            Attribute::Artist => Some(&self.artist),
            Attribute::Album => self.album(),
            Attribute::Year => self.year(),
            Attribute::Genre => self.genre(),
        }
    }
}

impl fmt::Display for SourceTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.title, self.artist)
    }
}

/// One album art image, passed through from the catalog unchanged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumImage {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

/// A destination catalog track considered as a match for a source track.
///
/// Title, artist and uri are guaranteed non-empty. The score is assigned
/// once, after scoring, and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CandidateTrackFields")]
pub struct CandidateTrack {
    title: String,
    artist: String,
    uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    album: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    album_art: Vec<AlbumImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<u8>,
}

impl CandidateTrack {
    /// Create a candidate, rejecting blank title, artist or uri
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        uri: impl Into<String>,
    ) -> Result<Self, MigrationError> {
        Ok(Self {
            title: required(title.into(), RecordKind::Candidate, "title")?,
            artist: required(artist.into(), RecordKind::Candidate, "artist")?,
            uri: required(uri.into(), RecordKind::Candidate, "uri")?,
            album: None,
            album_art: Vec::new(),
            year: None,
            genre: None,
            score: None,
        })
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = optional(album.into());
        self
    }

    pub fn with_album_art(mut self, images: Vec<AlbumImage>) -> Self {
        self.album_art = images;
        self
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = optional(year.into());
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = optional(genre.into());
        self
    }

    /// Attach the similarity score. Only the selector does this, exactly once.
    pub(crate) fn with_score(mut self, score: u8) -> Self {
        debug_assert!(self.score.is_none(), "candidate scored twice");
        self.score = Some(score);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn album(&self) -> Option<&str> {
        self.album.as_deref()
    }

    pub fn album_art(&self) -> &[AlbumImage] {
        &self.album_art
    }

    pub fn year(&self) -> Option<&str> {
        self.year.as_deref()
    }

    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref()
    }

    /// Similarity score, `None` until the candidate has been scored
    pub fn score(&self) -> Option<u8> {
        self.score
    }

    pub fn attribute(&self, attribute: Attribute) -> Option<&str> {
        match attribute {
            Attribute::Title => Some(&self.title),
            Attribute::Artist => Some(&self.artist),
            Attribute::Album => self.album(),
            Attribute::Year => self.year(),
            Attribute::Genre => self.genre(),
        }
    }
}

/// A source track and its destination match, if one was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedPair {
    pub source: SourceTrack,
    pub candidate: Option<CandidateTrack>,
}

impl MatchedPair {
    pub fn matched(source: SourceTrack, candidate: CandidateTrack) -> Self {
        Self {
            source,
            candidate: Some(candidate),
        }
    }

    pub fn unmatched(source: SourceTrack) -> Self {
        Self {
            source,
            candidate: None,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.candidate.is_some()
    }
}

/// Errors that can occur while migrating a library
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    #[error("Malformed {kind} record: missing {field}")]
    MalformedRecord {
        kind: RecordKind,
        field: &'static str,
    },

    #[error(
        "No match for {title} - {artist} - {} - {query}",
        .album.as_deref().unwrap_or("<no album>")
    )]
    NoMatch {
        title: String,
        artist: String,
        album: Option<String>,
        query: String,
    },

    #[error("Candidate shares no comparable attributes with the source track")]
    ScoringIndeterminate,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limited - try again later")]
    RateLimited,

    #[error("Access token rejected by the catalog")]
    Unauthorized,

    #[error("No access token supplied")]
    MissingToken,

    #[error("API request failed: {0}")]
    Api(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Failed to read library export: {0}")]
    Io(String),
}

impl MigrationError {
    /// Build a no-match error for a source track and the last query tried
    pub fn no_match(track: &SourceTrack, query: impl Into<String>) -> Self {
        Self::NoMatch {
            title: track.title().to_string(),
            artist: track.artist().to_string(),
            album: track.album().map(str::to_string),
            query: query.into(),
        }
    }

    /// Whether this error concerns only one track (the batch should continue)
    pub fn is_per_track(&self) -> bool {
        matches!(
            self,
            Self::MalformedRecord { .. } | Self::NoMatch { .. } | Self::ScoringIndeterminate
        )
    }
}

fn required(
    value: String,
    kind: RecordKind,
    field: &'static str,
) -> Result<String, MigrationError> {
    if value.trim().is_empty() {
        return Err(MigrationError::MalformedRecord { kind, field });
    }
    Ok(value)
}

fn optional(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}

// Serde shadows: deserialized reports go back through the checked constructors.

#[derive(Deserialize)]
struct SourceTrackFields {
    title: String,
    artist: String,
    album: Option<String>,
    year: Option<String>,
    genre: Option<String>,
}

impl TryFrom<SourceTrackFields> for SourceTrack {
    type Error = MigrationError;

    fn try_from(fields: SourceTrackFields) -> Result<Self, Self::Error> {
        let mut track = SourceTrack::new(fields.title, fields.artist)?;
        track.album = fields.album.and_then(optional);
        track.year = fields.year.and_then(optional);
        track.genre = fields.genre.and_then(optional);
        Ok(track)
    }
}

#[derive(Deserialize)]
struct CandidateTrackFields {
    title: String,
    artist: String,
    uri: String,
    album: Option<String>,
    #[serde(default)]
    album_art: Vec<AlbumImage>,
    year: Option<String>,
    genre: Option<String>,
    score: Option<u8>,
}

impl TryFrom<CandidateTrackFields> for CandidateTrack {
    type Error = MigrationError;

    fn try_from(fields: CandidateTrackFields) -> Result<Self, Self::Error> {
        let mut track = CandidateTrack::new(fields.title, fields.artist, fields.uri)?;
        track.album = fields.album.and_then(optional);
        track.album_art = fields.album_art;
        track.year = fields.year.and_then(optional);
        track.genre = fields.genre.and_then(optional);
        track.score = fields.score;
        Ok(track)
    }
}
