//! Shared rate limiter for catalog searches.
//!
//! Concurrent workers all draw request slots from one limiter, so the
//! catalog sees at most one search per interval no matter how many tracks
//! are in flight. The interval doubles when the catalog reports rate
//! limiting and drifts back to the base after a run of successes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::domain::MigrationError;
use super::traits::{CatalogSearchApi, SearchPage};

/// Consecutive successes before the interval is halved again
const SUCCESSES_TO_REDUCE: u32 = 10;

struct LimiterState {
    next_slot: Option<Instant>,
    current_interval: Duration,
    success_count: u32,
}

/// Minimum-interval rate limiter with adaptive backoff
pub struct RateLimiter {
    name: String,
    base_interval: Duration,
    max_interval: Duration,
    state: Mutex<LimiterState>,
}

impl RateLimiter {
    /// Create a limiter allowing one request per `base_interval`.
    ///
    /// Backoff is capped at 16x the base interval.
    pub fn new(name: &str, base_interval: Duration) -> Self {
        Self {
            name: name.to_string(),
            base_interval,
            max_interval: base_interval * 16,
            state: Mutex::new(LimiterState {
                next_slot: None,
                current_interval: base_interval,
                success_count: 0,
            }),
        }
    }

    /// Wait for the next free request slot.
    ///
    /// Slots are reserved under the lock and waited for outside it, so
    /// concurrent callers queue up one interval apart.
    pub async fn acquire(&self) {
        let wait = {
            let mut state = self.state.lock();
            let now = Instant::now();
            let slot = match state.next_slot {
                Some(next) if next > now => next,
                _ => now,
            };
            state.next_slot = Some(slot + state.current_interval);
            slot.saturating_duration_since(now)
        };

        if !wait.is_zero() {
            tracing::trace!("[{}] waiting {:?} for a request slot", self.name, wait);
            tokio::time::sleep(wait).await;
        }
    }

    /// Report a successful request
    pub fn report_success(&self) {
        let mut state = self.state.lock();
        if state.current_interval <= self.base_interval {
            return;
        }

        state.success_count += 1;
        if state.success_count >= SUCCESSES_TO_REDUCE {
            state.current_interval = (state.current_interval / 2).max(self.base_interval);
            state.success_count = 0;
            tracing::debug!(
                "[{}] Rate limit reduced to {:?}",
                self.name,
                state.current_interval
            );
        }
    }

    /// Report that the remote service rate limited us
    pub fn report_rate_limited(&self) {
        let mut state = self.state.lock();
        let doubled = (state.current_interval * 2).max(Duration::from_millis(1));
        state.current_interval = doubled.min(self.max_interval.max(Duration::from_millis(1)));
        state.success_count = 0;
        tracing::warn!(
            "[{}] Rate limited, interval increased to {:?}",
            self.name,
            state.current_interval
        );
    }
}

/// Catalog search gated by a shared [`RateLimiter`]
pub struct RateLimitedSearch<S> {
    inner: S,
    limiter: Arc<RateLimiter>,
}

impl<S> RateLimitedSearch<S> {
    pub fn new(inner: S, limiter: Arc<RateLimiter>) -> Self {
        Self { inner, limiter }
    }
}

#[async_trait]
impl<S: CatalogSearchApi> CatalogSearchApi for RateLimitedSearch<S> {
    async fn search(&self, query: &str, limit: u32) -> Result<SearchPage, MigrationError> {
        self.limiter.acquire().await;
        let result = self.inner.search(query, limit).await;
        match &result {
            Ok(_) => self.limiter.report_success(),
            Err(MigrationError::RateLimited) => self.limiter.report_rate_limited(),
            Err(_) => {}
        }
        result
    }
}
