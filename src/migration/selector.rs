//! Match selection - finds the best destination track for each source track.
//!
//! Per track:
//! 1. Search with every known attribute (title, artist, album)
//! 2. If nothing comes back, search again with the title alone
//! 3. If that is empty too, the track is unmatched
//! 4. Otherwise parse and score every result and keep the best one
//!
//! Ties keep the result the catalog ranked first. The selector never
//! retries: provider errors go straight back to the caller.

use std::sync::atomic::{AtomicBool, Ordering};

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};

use super::domain::{CandidateTrack, MatchedPair, MigrationError, SourceTrack};
use super::query::{QueryAttributes, build_query};
use super::scoring;
use super::spotify;
use super::spotify::dto::TrackObject;
use super::traits::CatalogSearchApi;

/// How often batch matching logs progress
const PROGRESS_INTERVAL: usize = 100;

/// Tunable matching behaviour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPolicy {
    /// Maximum results requested per search
    pub search_limit: u32,
    /// Matches scoring at or below this are reported as unmatched.
    /// `None` accepts every match.
    pub min_score: Option<u8>,
    /// Skip unparseable search results instead of failing the track
    pub skip_malformed: bool,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            search_limit: 50,
            min_score: None,
            skip_malformed: true,
        }
    }
}

impl MatchPolicy {
    /// Whether a match with this score passes the threshold
    pub fn accepts(&self, score: u8) -> bool {
        self.min_score.is_none_or(|min| score > min)
    }
}

/// Why a source track ended up without a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UnmatchedReason {
    /// Both search passes came back empty
    NoResults { query: String },
    /// Best candidate did not clear the minimum score
    BelowThreshold { best: CandidateTrack },
    /// The search or parsing failed for this track
    Failed { error: String },
}

/// Result of matching one source track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackOutcome {
    pub pair: MatchedPair,
    /// Set exactly when `pair` has no candidate
    pub unmatched: Option<UnmatchedReason>,
}

impl TrackOutcome {
    fn matched(pair: MatchedPair) -> Self {
        Self {
            pair,
            unmatched: None,
        }
    }

    fn unmatched(source: &SourceTrack, reason: UnmatchedReason) -> Self {
        Self {
            pair: MatchedPair::unmatched(source.clone()),
            unmatched: Some(reason),
        }
    }

    pub fn is_matched(&self) -> bool {
        self.pair.is_matched()
    }
}

/// Finds destination matches using an injected catalog search
pub struct MatchSelector<S> {
    search: S,
    policy: MatchPolicy,
}

impl<S: CatalogSearchApi> MatchSelector<S> {
    pub fn new(search: S, policy: MatchPolicy) -> Self {
        Self { search, policy }
    }

    pub fn policy(&self) -> &MatchPolicy {
        &self.policy
    }

    /// Find the best match for one source track.
    ///
    /// Fails with `NoMatch` when both search passes are empty. No score
    /// threshold is applied here; see [`MatchPolicy::accepts`].
    pub async fn find_match(&self, source: &SourceTrack) -> Result<MatchedPair, MigrationError> {
        let limit = self.policy.search_limit;

        let mut query = build_query(source, QueryAttributes::empty());
        let mut page = self.search.search(&query, limit).await?;

        if page.is_empty() {
            tracing::debug!("No results for {}, relaxing query", query);
            query = build_query(source, QueryAttributes::RELAXED);
            page = self.search.search(&query, limit).await?;

            if page.is_empty() {
                return Err(MigrationError::no_match(source, query));
            }
        }

        match self.select_best(source, page.items)? {
            Some(best) => Ok(MatchedPair::matched(source.clone(), best)),
            None => Err(MigrationError::no_match(source, query)),
        }
    }

    /// Match every track in order, one at a time.
    ///
    /// Every track gets an outcome; failures are recorded and the batch
    /// carries on. Once the access token is rejected the remaining tracks
    /// are marked failed without searching.
    pub async fn find_matches(&self, sources: &[SourceTrack]) -> Vec<TrackOutcome> {
        let rejected = AtomicBool::new(false);
        let mut outcomes = Vec::with_capacity(sources.len());

        for (i, source) in sources.iter().enumerate() {
            outcomes.push(self.match_outcome(source, &rejected).await);
            log_progress(i + 1, sources.len());
        }

        outcomes
    }

    /// Match tracks with up to `concurrency` searches in flight.
    ///
    /// Outcomes keep source order. Pair this with a rate-limited search so
    /// the extra workers do not exceed the catalog's limits.
    pub async fn find_matches_concurrent(
        &self,
        sources: &[SourceTrack],
        concurrency: usize,
    ) -> Vec<TrackOutcome> {
        let total = sources.len();
        let rejected = &AtomicBool::new(false);

        stream::iter(sources.iter().enumerate())
            .map(|(i, source)| async move {
                let outcome = self.match_outcome(source, rejected).await;
                log_progress(i + 1, total);
                outcome
            })
            .buffered(concurrency.max(1))
            .collect()
            .await
    }

    /// Run the pipeline for one track and apply the score threshold
    async fn match_outcome(&self, source: &SourceTrack, rejected: &AtomicBool) -> TrackOutcome {
        if rejected.load(Ordering::Relaxed) {
            return TrackOutcome::unmatched(
                source,
                UnmatchedReason::Failed {
                    error: MigrationError::Unauthorized.to_string(),
                },
            );
        }

        match self.find_match(source).await {
            Ok(pair) => match pair.candidate {
                Some(best) if !self.policy.accepts(best.score().unwrap_or(0)) => {
                    tracing::info!(
                        "Best match for {} scored {}, below threshold",
                        source,
                        best.score().unwrap_or(0)
                    );
                    TrackOutcome::unmatched(source, UnmatchedReason::BelowThreshold { best })
                }
                candidate => {
                    let score = candidate.as_ref().and_then(CandidateTrack::score);
                    tracing::debug!("Matched {} (score {:?})", source, score);
                    TrackOutcome::matched(MatchedPair {
                        source: pair.source,
                        candidate,
                    })
                }
            },
            Err(MigrationError::NoMatch { query, .. }) => {
                tracing::info!("No match for {} ({}) - Skipping.", source, query);
                TrackOutcome::unmatched(source, UnmatchedReason::NoResults { query })
            }
            Err(e) => {
                if matches!(e, MigrationError::Unauthorized)
                    && !rejected.swap(true, Ordering::Relaxed)
                {
                    tracing::error!("Access token rejected, skipping remaining searches");
                }
                if e.is_per_track() {
                    tracing::info!("Skipping {}: {}", source, e);
                } else {
                    tracing::warn!("Matching failed for {}: {}", source, e);
                }
                TrackOutcome::unmatched(
                    source,
                    UnmatchedReason::Failed {
                        error: e.to_string(),
                    },
                )
            }
        }
    }

    /// Parse and score every result, keeping the first highest score
    fn select_best(
        &self,
        source: &SourceTrack,
        items: Vec<TrackObject>,
    ) -> Result<Option<CandidateTrack>, MigrationError> {
        let mut best: Option<CandidateTrack> = None;

        for item in items {
            let candidate = match spotify::to_candidate(item) {
                Ok(candidate) => candidate,
                Err(e) if self.policy.skip_malformed => {
                    tracing::warn!("Ignoring search result for {}: {}", source, e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let score = scoring::score(source, &candidate);
            let candidate = candidate.with_score(score);

            // Strictly greater: earlier results win ties
            if best.as_ref().and_then(CandidateTrack::score).is_none_or(|top| score > top) {
                best = Some(candidate);
            }
        }

        Ok(best)
    }
}

fn log_progress(done: usize, total: usize) {
    if done % PROGRESS_INTERVAL == 0 && done != total {
        tracing::info!("Finished matching {} of {} tracks...", done, total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::traits::mocks::{MockCatalog, page};
    use crate::test_utils::{dark_side_search_item, dark_side_source, source_track, track_object};

    fn selector(catalog: MockCatalog) -> MatchSelector<MockCatalog> {
        MatchSelector::new(catalog, MatchPolicy::default())
    }

    #[tokio::test]
    async fn test_end_to_end_dark_side() {
        let selector = selector(MockCatalog::single_page(vec![dark_side_search_item()]));

        let pair = selector.find_match(&dark_side_source()).await.unwrap();
        let candidate = pair.candidate.as_ref().unwrap();

        assert_eq!(candidate.uri(), "spotify:track:1wGoqD0vrf7njGvxm8CEf5");
        assert_eq!(candidate.year(), Some("1973"));
        assert!(candidate.score().unwrap() > 75);
        assert_eq!(selector.search.call_count(), 1);
    }

    #[tokio::test]
    async fn test_first_query_uses_all_attributes() {
        let selector = selector(MockCatalog::single_page(vec![dark_side_search_item()]));
        selector.find_match(&dark_side_source()).await.unwrap();

        let queries = selector.search.queries.lock();
        assert_eq!(
            queries[0],
            "track:\"Any Colour You Like\"+artist:\"Pink Floyd\"+album:\"The Dark Side of the Moon\""
        );
    }

    #[tokio::test]
    async fn test_relaxed_pass_when_first_is_empty() {
        let catalog = MockCatalog::scripted(vec![
            Ok(page(vec![])),
            Ok(page(vec![track_object("Money", "Pink Floyd", "spotify:track:relaxed")])),
        ]);
        let selector = selector(catalog);
        let source = source_track("Money", "Pink Floyd").with_album("Wrong Album");

        let pair = selector.find_match(&source).await.unwrap();

        assert_eq!(pair.candidate.unwrap().uri(), "spotify:track:relaxed");
        let queries = selector.search.queries.lock();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[1], "track:\"Money\"");
    }

    #[tokio::test]
    async fn test_no_match_after_both_passes() {
        let selector = selector(MockCatalog::no_results());
        let source = source_track("Test Title", "Test Artist");

        let err = selector.find_match(&source).await.unwrap_err();

        let msg = err.to_string();
        assert!(matches!(err, MigrationError::NoMatch { .. }));
        assert!(msg.contains("Test Title"));
        assert!(msg.contains("Test Artist"));
        assert_eq!(selector.search.call_count(), 2);
    }

    #[tokio::test]
    async fn test_ties_keep_first_result() {
        let catalog = MockCatalog::single_page(vec![
            track_object("Time", "Pink Floyd", "spotify:track:first"),
            track_object("Time", "Pink Floyd", "spotify:track:second"),
        ]);
        let selector = selector(catalog);

        let pair = selector
            .find_match(&source_track("Time", "Pink Floyd"))
            .await
            .unwrap();
        assert_eq!(pair.candidate.unwrap().uri(), "spotify:track:first");
    }

    #[tokio::test]
    async fn test_imperfect_ties_keep_first_result() {
        let catalog = MockCatalog::single_page(vec![
            track_object("Money", "Pink Floyd", "spotify:track:weaker"),
            track_object("Time", "Pink Flod", "spotify:track:first"),
            track_object("Time", "Pink Flod", "spotify:track:second"),
        ]);
        let selector = selector(catalog);

        let pair = selector
            .find_match(&source_track("Time", "Pink Floyd"))
            .await
            .unwrap();
        let best = pair.candidate.unwrap();
        assert_eq!(best.uri(), "spotify:track:first");

        let score = best.score().unwrap();
        assert!(score < 100, "tie should be below a perfect score, got {}", score);
        assert!(score > 62, "tie should beat the first result, got {}", score);
    }

    #[tokio::test]
    async fn test_higher_score_wins_regardless_of_order() {
        let catalog = MockCatalog::single_page(vec![
            track_object("Money", "Pink Floyd", "spotify:track:other"),
            track_object("Time", "Pink Floyd", "spotify:track:original"),
        ]);
        let selector = selector(catalog);

        let pair = selector
            .find_match(&source_track("Time", "Pink Floyd"))
            .await
            .unwrap();
        let best = pair.candidate.unwrap();
        assert_eq!(best.uri(), "spotify:track:original");
        assert_eq!(best.score(), Some(100));
    }

    #[tokio::test]
    async fn test_malformed_results_are_skipped() {
        let mut broken = track_object("Time", "Pink Floyd", "x");
        broken.uri = None;
        let catalog = MockCatalog::single_page(vec![
            broken,
            track_object("Time", "Pink Floyd", "spotify:track:ok"),
        ]);
        let selector = selector(catalog);

        let pair = selector
            .find_match(&source_track("Time", "Pink Floyd"))
            .await
            .unwrap();
        assert_eq!(pair.candidate.unwrap().uri(), "spotify:track:ok");
    }

    #[tokio::test]
    async fn test_malformed_results_propagate_when_strict() {
        let mut broken = track_object("Time", "Pink Floyd", "x");
        broken.artists.clear();
        let policy = MatchPolicy {
            skip_malformed: false,
            ..Default::default()
        };
        let selector = MatchSelector::new(MockCatalog::single_page(vec![broken]), policy);

        let err = selector
            .find_match(&source_track("Time", "Pink Floyd"))
            .await
            .unwrap_err();
        assert!(matches!(err, MigrationError::MalformedRecord { .. }));
    }

    #[tokio::test]
    async fn test_all_results_malformed_is_no_match() {
        let mut broken = track_object("Time", "Pink Floyd", "x");
        broken.name = None;
        let selector = selector(MockCatalog::single_page(vec![broken]));

        let err = selector
            .find_match(&source_track("Time", "Pink Floyd"))
            .await
            .unwrap_err();
        assert!(matches!(err, MigrationError::NoMatch { .. }));
    }

    #[tokio::test]
    async fn test_provider_errors_propagate_without_retry() {
        let selector = selector(MockCatalog::with_error(MigrationError::Network(
            "timeout".to_string(),
        )));

        let err = selector
            .find_match(&source_track("Time", "Pink Floyd"))
            .await
            .unwrap_err();
        assert!(matches!(err, MigrationError::Network(_)));
        assert_eq!(selector.search.call_count(), 1);
    }

    #[test]
    fn test_policy_threshold() {
        let policy = MatchPolicy {
            min_score: Some(75),
            ..Default::default()
        };
        assert!(!policy.accepts(75));
        assert!(policy.accepts(76));
        assert!(MatchPolicy::default().accepts(0));
    }

    #[tokio::test]
    async fn test_find_matches_reports_every_track_in_order() {
        let catalog = MockCatalog::scripted(vec![
            Ok(page(vec![track_object("Time", "Pink Floyd", "spotify:track:time")])),
            Ok(page(vec![])),
            Ok(page(vec![])),
            Err(MigrationError::Network("reset".to_string())),
            Ok(page(vec![track_object("Money", "Pink Floyd", "spotify:track:money")])),
        ]);
        let selector = selector(catalog);
        let sources = vec![
            source_track("Time", "Pink Floyd"),
            source_track("Nothing", "Nobody"),
            source_track("Breathe", "Pink Floyd"),
            source_track("Money", "Pink Floyd"),
        ];

        let outcomes = selector.find_matches(&sources).await;

        assert_eq!(outcomes.len(), 4);
        assert!(outcomes[0].is_matched());
        assert!(matches!(
            outcomes[1].unmatched,
            Some(UnmatchedReason::NoResults { .. })
        ));
        assert!(matches!(
            outcomes[2].unmatched,
            Some(UnmatchedReason::Failed { .. })
        ));
        assert_eq!(outcomes[3].pair.source.title(), "Money");
        assert!(outcomes[3].is_matched());
    }

    #[tokio::test]
    async fn test_find_matches_applies_threshold() {
        let catalog = MockCatalog::single_page(vec![track_object(
            "Completely Different",
            "Someone Else",
            "spotify:track:bad",
        )]);
        let policy = MatchPolicy {
            min_score: Some(75),
            ..Default::default()
        };
        let selector = MatchSelector::new(catalog, policy);

        let outcomes = selector
            .find_matches(&[source_track("Time", "Pink Floyd")])
            .await;

        assert!(!outcomes[0].is_matched());
        let Some(UnmatchedReason::BelowThreshold { best }) = &outcomes[0].unmatched else {
            panic!("expected below-threshold outcome");
        };
        assert_eq!(best.uri(), "spotify:track:bad");
    }

    #[tokio::test]
    async fn test_rejected_token_skips_remaining_searches() {
        let selector = selector(MockCatalog::with_error(MigrationError::Unauthorized));
        let sources = vec![source_track("Time", "Pink Floyd"), source_track("Money", "Pink Floyd")];

        let outcomes = selector.find_matches(&sources).await;

        assert_eq!(outcomes.len(), 2);
        assert!(
            outcomes
                .iter()
                .all(|o| matches!(o.unmatched, Some(UnmatchedReason::Failed { .. })))
        );
        assert_eq!(selector.search.call_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_matching_keeps_order() {
        // Every search finds the same candidate; what matters is the ordering
        let items = vec![track_object("Time", "Pink Floyd", "spotify:track:time")];
        let catalog = MockCatalog::scripted((0..6).map(|_| Ok(page(items.clone()))).collect());
        let selector = selector(catalog);
        let sources: Vec<_> = ["Time", "Money", "Us and Them", "Eclipse", "Breathe", "Speak to Me"]
            .into_iter()
            .map(|title| source_track(title, "Pink Floyd"))
            .collect();

        let outcomes = selector.find_matches_concurrent(&sources, 3).await;

        assert_eq!(outcomes.len(), sources.len());
        for (outcome, source) in outcomes.iter().zip(&sources) {
            assert_eq!(&outcome.pair.source, source);
            assert!(outcome.is_matched());
        }
    }
}
