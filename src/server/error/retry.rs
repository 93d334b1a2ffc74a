use sea_orm::DbErr;

use super::{fetch::FetchError, Error};

/// Strategy for handling errors in a retry context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorRetryStrategy {
    /// Retry with backoff (throttling, server errors, dropped connections)
    Retry,
    /// Failed permanently (bad request, malformed data)
    Fail,
}

impl FetchError {
    /// Determine retry strategy for an upstream failure.
    pub fn to_retry_strategy(&self) -> ErrorRetryStrategy {
        match self {
            // 429/420 - upstream asked us to slow down, the same request will succeed later
            Self::Throttled { .. } => ErrorRetryStrategy::Retry,

            Self::Status { status, .. } => match *status {
                // 500 - upstream temporarily unavailable
                s if s >= 500 => ErrorRetryStrategy::Retry,
                // 400 - we're asking for something upstream will never give us
                _ => ErrorRetryStrategy::Fail,
            },

            Self::Request(reqwest_error) => {
                if reqwest_error.is_decode() || reqwest_error.is_builder() {
                    ErrorRetryStrategy::Fail
                } else {
                    // Network error, timeout or connection reset - should retry
                    ErrorRetryStrategy::Retry
                }
            }

            // Retrying a malformed body returns the same malformed body
            Self::Malformed { .. } => ErrorRetryStrategy::Fail,

            // Still a transient failure, the next run may succeed
            Self::RetriesExhausted { .. } => ErrorRetryStrategy::Retry,
        }
    }

    /// True when the failure is expected to clear up on a later run.
    pub fn is_transient(&self) -> bool {
        self.to_retry_strategy() == ErrorRetryStrategy::Retry
    }
}

impl Error {
    /// Determine error retry strategy based upon application Error type
    pub fn to_retry_strategy(&self) -> ErrorRetryStrategy {
        match self {
            Self::FetchError(fetch_error) => fetch_error.to_retry_strategy(),

            Self::DbErr(db_err) => {
                match db_err {
                    // Connection acquisition errors - transient, should retry
                    DbErr::ConnectionAcquire(_) => ErrorRetryStrategy::Retry,
                    // Connection errors - transient, should retry
                    DbErr::Conn(_) => ErrorRetryStrategy::Retry,

                    // All other database errors are permanent failures:
                    // - Query errors (constraint violations, syntax errors, etc.)
                    // - Type conversion errors
                    // - Record not found/inserted/updated
                    _ => ErrorRetryStrategy::Fail,
                }
            }

            // Valkey errors are almost always connection issues
            Self::RedisError(_) => ErrorRetryStrategy::Retry,

            Self::ConfigError(_) => ErrorRetryStrategy::Fail,
            Self::ParseError(_) => ErrorRetryStrategy::Fail,
            Self::InternalError(_) => ErrorRetryStrategy::Fail,
            Self::HttpClientError(_) => ErrorRetryStrategy::Fail,
            Self::SchedulerError(_) => ErrorRetryStrategy::Fail,
        }
    }
}
