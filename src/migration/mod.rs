//! Library migration module - finds each source library track in the
//! destination catalog and saves the matches.
//!
//! # Architecture
//!
//! This module follows a clean separation between:
//! - **Domain models** (`domain.rs`) - Internal types that represent our business logic
//! - **DTOs** (`spotify/dto.rs`, `source/dto.rs`) - Exact shapes of API responses and exports
//! - **Adapters** - Convert DTOs to domain models
//! - **Clients** - HTTP client for the destination catalog, file reader for the source export
//! - **Query / Scoring / Selector** - Search query construction, fuzzy similarity, best-match choice
//! - **Rate limiting** - One request budget shared by all concurrent searches
//! - **Service** - High-level orchestration of the migration flow
//!
//! This decoupling means:
//! 1. API changes don't ripple through our codebase
//! 2. Matching is tested against mock catalogs with no network
//! 3. Either side of the migration can be swapped without touching the matcher
//!
//! # Usage
//!
//! ```ignore
//! use migration::{MigrationService, MigrationConfig, LibraryExport};
//!
//! let config = MigrationConfig {
//!     access_token: "your-token".to_string(),
//!     ..Default::default()
//! };
//! let service = MigrationService::new(config)?;
//!
//! let (loaded, report) = service.migrate_library(&LibraryExport::new("library.json")).await?;
//! println!("{}", report.summary());
//! let failed = service.save_matches(&report.uris()).await;
//! ```

pub mod domain;
pub mod query;
pub mod rate_limit;
pub mod report;
pub mod scoring;
pub mod selector;
pub mod service;
pub mod source;
pub mod spotify;
pub mod traits;

pub use domain::{CandidateTrack, MatchedPair, MigrationError, SourceTrack};
pub use report::MigrationReport;
pub use selector::{MatchPolicy, MatchSelector, TrackOutcome, UnmatchedReason};
pub use service::{MigrationConfig, MigrationService};
pub use source::LibraryExport;
