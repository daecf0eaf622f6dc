//! Source library access
//!
//! Reads the user's library from an export of the source service and turns
//! it into validated [`SourceTrack`]s. Songs missing a mandatory field are
//! logged and skipped; the rest of the library still migrates.

pub mod dto;
mod adapter;

use std::path::PathBuf;

pub use adapter::to_source_track;

use super::domain::{MigrationError, SourceTrack};
use super::traits::SourceLibraryApi;

/// A library export file on disk
pub struct LibraryExport {
    path: PathBuf,
}

impl LibraryExport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read and parse the export
    pub async fn read(&self) -> Result<Vec<dto::RawTrack>, MigrationError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| MigrationError::Io(format!("{}: {}", self.path.display(), e)))?;

        let file: dto::LibraryExportFile = serde_json::from_str(&contents)
            .map_err(|e| MigrationError::Parse(format!("{}: {}", self.path.display(), e)))?;

        Ok(file.into_tracks())
    }
}

/// Source tracks ready for matching
#[derive(Debug, Clone, Default)]
pub struct LoadedLibrary {
    /// Valid tracks, in library order
    pub tracks: Vec<SourceTrack>,
    /// Number of songs skipped as malformed
    pub rejected: usize,
}

/// Read the source library and validate every song.
///
/// Malformed songs are skipped with a warning. Read failures propagate.
pub async fn load_library(
    library: &dyn SourceLibraryApi,
) -> Result<LoadedLibrary, MigrationError> {
    let raw_tracks = library.read_library().await?;
    let mut loaded = LoadedLibrary {
        tracks: Vec::with_capacity(raw_tracks.len()),
        rejected: 0,
    };

    for raw in raw_tracks {
        let label = format!(
            "{} - {}",
            raw.title.as_deref().unwrap_or("?"),
            raw.artist.as_deref().unwrap_or("?")
        );
        match to_source_track(raw) {
            Ok(track) => loaded.tracks.push(track),
            Err(e) => {
                tracing::warn!("Skipping {}: {}", label, e);
                loaded.rejected += 1;
            }
        }
    }

    tracing::info!(
        "Loaded {} tracks from source library ({} skipped)",
        loaded.tracks.len(),
        loaded.rejected
    );
    Ok(loaded)
}
