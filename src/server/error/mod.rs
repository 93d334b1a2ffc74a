//! Error types for the tallyman pipeline.
//!
//! Domain errors live in submodules (configuration, upstream fetches) and are aggregated into
//! the top-level [`Error`]. Retry classification for every variant lives in [`retry`].

pub mod config;
pub mod fetch;
pub mod retry;

use thiserror::Error;

use crate::server::error::{config::ConfigError, fetch::FetchError};

/// Main error type for the tallyman pipeline.
///
/// Aggregates domain-specific error types and external library errors so services can use `?`
/// freely. Scope-level failures are reported through the run summary instead of bubbling up,
/// so an `Error` escaping `run_once` always means the run itself could not proceed.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Upstream fetch error (zKillboard or ESI).
    #[error(transparent)]
    FetchError(#[from] FetchError),
    /// Parse error (failed to parse a value from string or other format).
    #[error("Failed to parse value: {0:?}")]
    ParseError(String),
    /// Internal error indicating a bug in tallyman's code.
    #[error("Internal error with tallyman's code, please open an issue as this indicates a bug: {0:?}")]
    InternalError(String),
    /// Database error (query failures, connection issues, constraint violations).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// Valkey/Redis error (connection, script execution).
    #[error(transparent)]
    RedisError(#[from] fred::error::Error),
    /// HTTP client construction error.
    #[error(transparent)]
    HttpClientError(#[from] reqwest::Error),
    /// Cron scheduler error (job registration, scheduler startup).
    #[error(transparent)]
    SchedulerError(#[from] tokio_cron_scheduler::JobSchedulerError),
}
