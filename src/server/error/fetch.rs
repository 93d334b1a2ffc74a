//! Upstream fetch errors.

use std::time::Duration;

use thiserror::Error;

/// Failure talking to zKillboard or ESI.
///
/// Whether a failure is worth retrying is decided by
/// [`FetchError::to_retry_strategy`](crate::server::error::fetch::FetchError::to_retry_strategy).
#[derive(Error, Debug)]
pub enum FetchError {
    /// Upstream signalled rate limiting (HTTP 429, or 420 from ESI's error limiter).
    #[error("Upstream throttled request to {url}")]
    Throttled {
        url: String,
        retry_after: Option<Duration>,
    },
    /// Upstream answered with a non-success status other than throttling.
    #[error("Upstream returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },
    /// Transport level failure (connect, timeout, body read).
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    /// Response body did not match the expected record shape.
    #[error("Malformed upstream response from {url}: {reason}")]
    Malformed { url: String, reason: String },
    /// A retryable failure kept happening until the attempt budget ran out.
    #[error("Giving up on {url} after {attempts} attempts: {last}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last: Box<FetchError>,
    },
}
