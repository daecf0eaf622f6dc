//! Application-wide error types.
//!
//! This module provides a unified error hierarchy for the application.
//! Library modules use specific error types via `thiserror`, while
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level application error enum
//! - Module-specific errors (e.g., [`MigrationError`]) for detailed handling
//! - All errors implement `std::error::Error` for compatibility
//!
//! # Example
//!
//! ```ignore
//! use music_migrator::error::{Result, ResultExt};
//!
//! fn load_report(path: &Path) -> Result<MigrationReport> {
//!     let contents = std::fs::read_to_string(path).with_context("reading report")?;
//!     serde_json::from_str(&contents).with_context("parsing report")
//! }
//! ```

use std::path::PathBuf;

use crate::migration::MigrationError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
///
/// Aggregates errors from all subsystems for unified handling.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Matching or catalog error
    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),

    /// File not found
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Invalid file format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a not found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound(path.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, serde_json::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::InvalidFormat(e.to_string()).context(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::not_found("/path/to/report.json");
        assert!(err.to_string().contains("/path/to/report.json"));
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::InvalidFormat("expected array".to_string()).context("while reading export");
        let msg = err.to_string();
        assert!(msg.contains("while reading export"));
        assert!(msg.contains("expected array"));
    }

    #[test]
    fn test_migration_error_converts() {
        let err: Error = MigrationError::RateLimited.into();
        assert!(matches!(err, Error::Migration(MigrationError::RateLimited)));
    }

    #[test]
    fn test_result_ext() {
        let result: Result<()> = Err(Error::not_found("report.json"));
        let with_ctx = result.with_context("additional context");
        assert!(with_ctx.unwrap_err().to_string().contains("additional context"));
    }

    #[test]
    fn test_json_result_ext() {
        let result: std::result::Result<u32, _> = serde_json::from_str::<u32>("nope");
        let err = result.with_context("parsing count").unwrap_err();
        assert!(matches!(err, Error::WithContext { .. }));
        assert!(err.to_string().starts_with("parsing count"));
    }
}
