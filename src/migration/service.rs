//! Migration service - orchestrates matching and saving a whole library
//!
//! This is the high-level API for migrating a library:
//! 1. Load and validate the source library
//! 2. Match every track against the destination catalog
//! 3. Build a report of matched and unmatched tracks
//! 4. Save the matched tracks to the destination library in batches

use std::sync::Arc;
use std::time::Duration;

use crate::migration::{
    domain::{MatchedPair, MigrationError, SourceTrack},
    rate_limit::{RateLimitedSearch, RateLimiter},
    report::MigrationReport,
    selector::{MatchPolicy, MatchSelector},
    source::{LoadedLibrary, load_library},
    spotify::{SAVE_BATCH_LIMIT, SpotifyClient},
    traits::{CatalogSearchApi, LibraryWriteApi, SourceLibraryApi},
};

/// Configuration for the migration service
pub struct MigrationConfig {
    /// Spotify OAuth access token with `user-library-modify` scope
    pub access_token: String,
    /// Matching behaviour
    pub policy: MatchPolicy,
    /// Searches in flight at once (1 = sequential)
    pub concurrency: usize,
    /// Minimum spacing between searches, shared by all workers
    pub min_request_interval: Duration,
    /// HTTP request timeout
    pub timeout: Duration,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            policy: MatchPolicy::default(),
            concurrency: 1,
            min_request_interval: Duration::from_millis(100),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Service for migrating a library into the destination catalog
pub struct MigrationService {
    selector: MatchSelector<Arc<dyn CatalogSearchApi>>,
    writer: Arc<dyn LibraryWriteApi>,
    concurrency: usize,
}

impl MigrationService {
    /// Create a service talking to Spotify with the given config
    pub fn new(config: MigrationConfig) -> Result<Self, MigrationError> {
        if config.access_token.trim().is_empty() {
            return Err(MigrationError::MissingToken);
        }

        let client = Arc::new(SpotifyClient::new(&config.access_token, config.timeout)?);
        let limiter = Arc::new(RateLimiter::new("spotify", config.min_request_interval));
        let search: Arc<dyn CatalogSearchApi> =
            Arc::new(RateLimitedSearch::new(client.clone(), limiter));

        Ok(Self::with_clients(
            search,
            client,
            config.policy,
            config.concurrency,
        ))
    }

    /// Create a service from existing clients
    pub fn with_clients(
        search: Arc<dyn CatalogSearchApi>,
        writer: Arc<dyn LibraryWriteApi>,
        policy: MatchPolicy,
        concurrency: usize,
    ) -> Self {
        Self {
            selector: MatchSelector::new(search, policy),
            writer,
            concurrency: concurrency.max(1),
        }
    }

    pub fn policy(&self) -> &MatchPolicy {
        self.selector.policy()
    }

    /// Find the best match for one track (no threshold applied)
    pub async fn find_match(&self, track: &SourceTrack) -> Result<MatchedPair, MigrationError> {
        self.selector.find_match(track).await
    }

    /// Match every track and build a report
    pub async fn migrate(&self, tracks: &[SourceTrack]) -> MigrationReport {
        tracing::info!(
            "Matching {} tracks ({} concurrent)",
            tracks.len(),
            self.concurrency
        );

        let outcomes = if self.concurrency > 1 {
            self.selector
                .find_matches_concurrent(tracks, self.concurrency)
                .await
        } else {
            self.selector.find_matches(tracks).await
        };

        let report = MigrationReport::from_outcomes(outcomes);
        tracing::info!("{}", report.summary());
        report
    }

    /// Load a source library and match it
    pub async fn migrate_library(
        &self,
        library: &dyn SourceLibraryApi,
    ) -> Result<(LoadedLibrary, MigrationReport), MigrationError> {
        let loaded = load_library(library).await?;
        let report = self.migrate(&loaded.tracks).await;
        Ok((loaded, report))
    }

    /// Save tracks to the destination library in batches.
    ///
    /// A failed batch is logged and counted, and the remaining batches are
    /// still attempted. Returns the number of tracks that failed to save.
    pub async fn save_matches(&self, uris: &[String]) -> usize {
        let mut failed = 0;

        for (i, batch) in chunk_uris(uris, SAVE_BATCH_LIMIT).enumerate() {
            match self.writer.save_tracks(batch).await {
                Ok(()) => tracing::debug!("Saved batch {} ({} tracks)", i + 1, batch.len()),
                Err(e) => {
                    tracing::warn!("Failed to save batch {}: {}", i + 1, e);
                    failed += batch.len();
                }
            }
        }

        if failed > 0 {
            tracing::warn!("{} of {} tracks failed to save", failed, uris.len());
        } else {
            tracing::info!("Saved {} tracks", uris.len());
        }
        failed
    }
}

/// Split URIs into consecutive batches of at most `size`
pub fn chunk_uris(uris: &[String], size: usize) -> std::slice::Chunks<'_, String> {
    uris.chunks(size.max(1))
}
