//! Trait definitions for the external services the migration depends on.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses the Spotify client and the library export reader,
//! while tests substitute the mocks below.
//!
//! # Example
//!
//! ```ignore
//! use music_migrator::migration::traits::CatalogSearchApi;
//!
//! async fn first_hit<T: CatalogSearchApi>(catalog: &T) -> Option<TrackObject> {
//!     catalog.search("track:\"Time\"", 1).await.ok()?.items.into_iter().next()
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use super::domain::MigrationError;
use super::source::dto::RawTrack;
use super::spotify::dto::TrackObject;

/// One page of raw catalog search results
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    /// Total matches reported by the catalog
    pub total: u32,
    /// Raw results in the catalog's ranking order
    pub items: Vec<TrackObject>,
}

impl SearchPage {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Destination catalog search.
///
/// Authentication and request timeouts belong to the implementation.
#[async_trait]
pub trait CatalogSearchApi: Send + Sync {
    /// Search for tracks, returning at most `limit` results
    async fn search(&self, query: &str, limit: u32) -> Result<SearchPage, MigrationError>;
}

/// Source library read access
#[async_trait]
pub trait SourceLibraryApi: Send + Sync {
    /// Read every track in the library, in library order
    async fn read_library(&self) -> Result<Vec<RawTrack>, MigrationError>;
}

/// Destination library write access
#[async_trait]
pub trait LibraryWriteApi: Send + Sync {
    /// Add one batch of tracks to the user's saved tracks
    async fn save_tracks(&self, uris: &[String]) -> Result<(), MigrationError>;
}

// Implement traits for real clients

#[async_trait]
impl CatalogSearchApi for super::spotify::SpotifyClient {
    async fn search(&self, query: &str, limit: u32) -> Result<SearchPage, MigrationError> {
        self.search(query, limit).await
    }
}

#[async_trait]
impl LibraryWriteApi for super::spotify::SpotifyClient {
    async fn save_tracks(&self, uris: &[String]) -> Result<(), MigrationError> {
        self.save_tracks(uris).await
    }
}

#[async_trait]
impl SourceLibraryApi for super::source::LibraryExport {
    async fn read_library(&self) -> Result<Vec<RawTrack>, MigrationError> {
        self.read().await
    }
}

// Shared handles forward to the inner implementation

#[async_trait]
impl<T: CatalogSearchApi + ?Sized> CatalogSearchApi for Arc<T> {
    async fn search(&self, query: &str, limit: u32) -> Result<SearchPage, MigrationError> {
        (**self).search(query, limit).await
    }
}

#[async_trait]
impl<T: LibraryWriteApi + ?Sized> LibraryWriteApi for Arc<T> {
    async fn save_tracks(&self, uris: &[String]) -> Result<(), MigrationError> {
        (**self).save_tracks(uris).await
    }
}
