//! Upstream request pacing.
//!
//! zKillboard asks clients to keep at least half a second between requests and answers with
//! HTTP 429 when they don't. [`RateLimiter`] enforces the spacing for every caller sharing it
//! and pushes the next permitted slot out when upstream signals throttling.

use std::{
    sync::{Mutex, PoisonError},
    time::Duration,
};

use tokio::time::Instant;

/// Backoff applied to the first throttle without a Retry-After hint.
const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(2);
/// Upper bound for the exponential default backoff.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Minimum-interval limiter with reactive backoff.
///
/// Share one instance (behind an `Arc`) between every task that talks to the same upstream so
/// the total request rate is bounded no matter how many scopes run in parallel.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    state: Mutex<LimiterState>,
}

#[derive(Debug, Default)]
struct LimiterState {
    next_permitted: Option<Instant>,
    /// Consecutive throttle signals since the last success.
    throttle_streak: u32,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            state: Mutex::new(LimiterState::default()),
        }
    }

    /// Suspend until the caller may issue its request, then reserve the following slot.
    pub async fn wait(&self) {
        loop {
            let target = {
                let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
                let now = Instant::now();

                match state.next_permitted {
                    Some(next) if next > now => next,
                    _ => {
                        state.next_permitted = Some(now + self.min_interval);
                        return;
                    }
                }
            };

            // Re-check after waking: a throttle signal may have pushed the slot further out.
            tokio::time::sleep_until(target).await;
        }
    }

    /// Record an upstream throttling signal.
    ///
    /// # Arguments
    /// - `retry_after` - Upstream's Retry-After hint; when absent an exponential default
    ///   (2s, 4s, 8s, ... capped at 60s) is used
    ///
    /// # Returns
    /// The delay applied before the next permitted request.
    pub fn on_throttled(&self, retry_after: Option<Duration>) -> Duration {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.throttle_streak = state.throttle_streak.saturating_add(1);

        let delay = retry_after.unwrap_or_else(|| {
            let exponent = state.throttle_streak.saturating_sub(1).min(16);
            DEFAULT_BACKOFF_BASE
                .saturating_mul(2_u32.pow(exponent))
                .min(MAX_BACKOFF)
        });

        let until = Instant::now() + delay;
        state.next_permitted = Some(match state.next_permitted {
            Some(next) if next > until => next,
            _ => until,
        });

        tracing::debug!(
            throttle_streak = state.throttle_streak,
            "Upstream throttled, backing off for {:?}",
            delay
        );

        delay
    }

    /// Record a successful request, decaying any throttle backoff back to the base interval.
    pub fn on_success(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.throttle_streak > 0 {
            tracing::debug!("Upstream recovered after {} throttle(s)", state.throttle_streak);
            state.throttle_streak = 0;
        }
    }
}
