//! Retry logic with exponential backoff for persistence operations.
//!
//! Upstream requests have their own throttle-aware retry loop in the fetch layer; this context
//! covers the other side of the pipeline, where a dropped database connection mid-batch should
//! not fail a whole scope.

use std::{future::Future, time::Duration};

use rand::Rng;

use crate::server::error::{retry::ErrorRetryStrategy, Error};

/// Context for executing operations with automatic retry logic.
///
/// # Retry Behavior
///
/// - **Max attempts**: 3 (default)
/// - **Backoff strategy**: Exponential starting at 1 second (1s, 2s, 4s, ...) plus up to 250ms
///   of jitter so parallel scopes do not retry in lockstep
/// - **Retry conditions**: Only errors with `ErrorRetryStrategy::Retry` are retried
/// - **Permanent failures**: Errors with `ErrorRetryStrategy::Fail` return immediately
pub struct RetryContext {
    /// Max attempts before failure
    max_attempts: u32,
    /// Initial backoff between attempts
    initial_backoff: Duration,
}

impl Default for RetryContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryContext {
    const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_secs(1);
    const MAX_JITTER_MS: u64 = 250;

    pub fn new() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            initial_backoff: Self::DEFAULT_INITIAL_BACKOFF,
        }
    }

    pub fn with_initial_backoff(mut self, initial_backoff: Duration) -> Self {
        self.initial_backoff = initial_backoff;
        self
    }

    /// Execute an operation with automatic retry logic
    ///
    /// The operation is invoked again from scratch on every attempt, so it must be safe to
    /// repeat (a transaction that rolled back, an idempotent upsert).
    ///
    /// # Arguments
    /// - `description`: Description of the operation for logging (e.g., "killmail batch")
    /// - `operation`: Closure producing the future to run for each attempt
    pub async fn execute_with_retry<R, F, Fut>(
        &self,
        description: &str,
        operation: F,
    ) -> Result<R, Error>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<R, Error>>,
    {
        let mut attempt_count = 0;

        loop {
            tracing::debug!(
                "Processing {} (attempt {}/{})",
                description,
                attempt_count + 1,
                self.max_attempts
            );

            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => match e.to_retry_strategy() {
                    ErrorRetryStrategy::Fail => {
                        tracing::error!("Permanent error for {}: {:?}", description, e);
                        return Err(e);
                    }
                    ErrorRetryStrategy::Retry => {
                        attempt_count += 1;
                        if attempt_count >= self.max_attempts {
                            tracing::error!(
                                "Max attempts ({}) exceeded for {}: {:?}",
                                self.max_attempts,
                                description,
                                e
                            );
                            return Err(e);
                        }

                        let jitter = rand::rng().random_range(0..=Self::MAX_JITTER_MS);
                        let backoff = self.initial_backoff * 2_u32.pow(attempt_count - 1)
                            + Duration::from_millis(jitter);

                        tracing::warn!(
                            "Retrying {} (attempt {}/{}) after {:?}: {:?}",
                            description,
                            attempt_count,
                            self.max_attempts,
                            backoff,
                            e
                        );

                        tokio::time::sleep(backoff).await;
                    }
                },
            }
        }
    }
}
