//! Migration report - the persisted outcome of a matching run.
//!
//! The report is written as JSON so a run can be reviewed before anything
//! is saved to the destination library, and saved later from the file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::{MatchedPair, SourceTrack};
use super::selector::{TrackOutcome, UnmatchedReason};
use crate::error::{Error, Result, ResultExt};

/// A source track that did not get a match, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedEntry {
    pub source: SourceTrack,
    #[serde(flatten)]
    pub reason: UnmatchedReason,
}

/// Outcome of matching a whole library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationReport {
    /// RFC 3339 timestamp of when the report was built
    pub generated_at: String,
    /// Source tracks considered
    pub total: usize,
    /// Matched pairs, in source order
    pub matched: Vec<MatchedPair>,
    /// Unmatched tracks, in source order
    pub unmatched: Vec<UnmatchedEntry>,
}

impl MigrationReport {
    /// Split outcomes into matched and unmatched, keeping source order
    pub fn from_outcomes(outcomes: Vec<TrackOutcome>) -> Self {
        let total = outcomes.len();
        let mut matched = Vec::new();
        let mut unmatched = Vec::new();

        for outcome in outcomes {
            match outcome.unmatched {
                None => matched.push(outcome.pair),
                Some(reason) => unmatched.push(UnmatchedEntry {
                    source: outcome.pair.source,
                    reason,
                }),
            }
        }

        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            total,
            matched,
            unmatched,
        }
    }

    /// Destination URIs of every match, in source order
    pub fn uris(&self) -> Vec<String> {
        self.matched
            .iter()
            .filter_map(|pair| pair.candidate.as_ref())
            .map(|candidate| candidate.uri().to_string())
            .collect()
    }

    pub fn matched_count(&self) -> usize {
        self.matched.len()
    }

    /// One-line summary for the console
    pub fn summary(&self) -> String {
        format!("Matched {} of {} tracks", self.matched_count(), self.total)
    }

    /// Write the report as pretty JSON
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).with_context("Failed to serialize report")?;
        std::fs::write(path, json)
            .with_context(format!("Failed to write report to {}", path.display()))?;
        tracing::info!("Wrote migration report to {:?}", path);
        Ok(())
    }

    /// Read a report written by [`MigrationReport::write_to`]
    pub fn read_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::not_found(path));
        }
        let contents = std::fs::read_to_string(path)
            .with_context(format!("Failed to read report {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(format!("Invalid report file {}", path.display()))
    }
}
