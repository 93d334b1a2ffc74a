//! Rate-limited upstream retrieval.
//!
//! [`UpstreamHttp`] is the single request path for both zKillboard pages ([`zkill`]) and ESI
//! hydration ([`esi`]): every attempt waits on the shared [`RateLimiter`], throttling responses
//! push the limiter back, and transient failures are retried within a bounded attempt budget.

pub mod esi;
pub mod zkill;

use std::{sync::Arc, time::Duration};

use reqwest::{header::RETRY_AFTER, StatusCode};
use serde::de::DeserializeOwned;

use crate::server::{
    error::{fetch::FetchError, retry::ErrorRetryStrategy},
    service::rate_limit::RateLimiter,
};

/// ESI's error-limit status; treated like 429.
const STATUS_ENHANCE_YOUR_CALM: u16 = 420;
/// Backoff before the first retry of a non-throttle transient failure.
const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_secs(1);
/// Ceiling for the doubling backoff.
const MAX_BACKOFF: Duration = Duration::from_secs(300);

pub struct UpstreamHttp {
    client: reqwest::Client,
    limiter: Arc<RateLimiter>,
    max_attempts: u32,
    initial_backoff: Duration,
}

impl UpstreamHttp {
    pub fn new(client: reqwest::Client, limiter: Arc<RateLimiter>, max_attempts: u32) -> Self {
        Self {
            client,
            limiter,
            max_attempts: max_attempts.max(1),
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
        }
    }

    pub fn with_initial_backoff(mut self, initial_backoff: Duration) -> Self {
        self.initial_backoff = initial_backoff;
        self
    }

    /// GET `url` and deserialize the JSON body.
    ///
    /// # Retry Behavior
    /// - **429/420**: the limiter is pushed back by Retry-After (or its exponential default) and
    ///   the request is repeated once the limiter permits
    /// - **5xx and transport errors**: exponential backoff from the initial backoff
    /// - **Other 4xx and malformed bodies**: returned immediately
    ///
    /// # Returns
    /// - `Ok(T)` - Body parsed
    /// - `Err(FetchError::RetriesExhausted)` - A transient failure persisted for every attempt
    /// - `Err(FetchError)` - Definitive failure
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let mut attempt = 0;

        loop {
            attempt += 1;
            self.limiter.wait().await;

            let error = match self.try_get(url).await {
                Ok(value) => {
                    self.limiter.on_success();
                    return Ok(value);
                }
                Err(e) => e,
            };

            if error.to_retry_strategy() == ErrorRetryStrategy::Fail {
                return Err(error);
            }

            if attempt >= self.max_attempts {
                return Err(FetchError::RetriesExhausted {
                    url: url.to_string(),
                    attempts: attempt,
                    last: Box::new(error),
                });
            }

            match error {
                FetchError::Throttled { retry_after, .. } => {
                    let delay = self.limiter.on_throttled(retry_after);
                    tracing::warn!(
                        attempt,
                        "Throttled by upstream on {}, next request in {:?}",
                        url,
                        delay
                    );
                }
                _ => {
                    let backoff = self.backoff(attempt);
                    tracing::warn!(
                        attempt,
                        "Transient failure on {}, retrying after {:?}: {}",
                        url,
                        backoff,
                        error
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    /// Delay after the given failed attempt, doubling from the initial backoff up to a ceiling.
    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt.saturating_sub(1));

        self.initial_backoff.saturating_mul(factor).min(MAX_BACKOFF)
    }

    async fn try_get<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS || status.as_u16() == STATUS_ENHANCE_YOUR_CALM {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok())
                .map(Duration::from_secs);

            return Err(FetchError::Throttled {
                url: url.to_string(),
                retry_after,
            });
        }

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;

        serde_json::from_slice(&body).map_err(|e| FetchError::Malformed {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
