//! Environment-driven configuration.
//!
//! Values are read from the process environment (optionally seeded from a `.env` file by the
//! binary). Only the database URL and operator contact email are required; every pipeline
//! tunable has a default suited to zKillboard's published limits.

use std::{str::FromStr, time::Duration};

use crate::server::{
    error::{config::ConfigError, Error},
    scheduler::config::ingest,
};

/// Default zKillboard API host.
pub const DEFAULT_ZKILL_URL: &str = "https://zkillboard.com";
/// Default ESI host used to hydrate summary killmails.
pub const DEFAULT_ESI_URL: &str = "https://esi.evetech.net/latest";
/// Logical name of the pipeline run lock.
pub const PIPELINE_LOCK_NAME: &str = "tallyman-pull-killmails";

pub struct Config {
    pub database_url: String,
    /// When set, the run lock lives in Valkey instead of the database.
    pub valkey_url: Option<String>,
    pub contact_email: String,
    pub user_agent: String,
    pub zkill_url: String,
    pub esi_url: String,
    pub ingest_cron: String,
    pub retention_days: i64,
    pub pipeline: PipelineConfig,
}

/// Tunables for a single pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub lock_name: String,
    /// Must exceed the worst-case run duration.
    pub lock_ttl: Duration,
    /// Minimum spacing between zKillboard requests.
    pub min_request_interval: Duration,
    /// Minimum spacing between ESI hydration requests.
    pub esi_request_interval: Duration,
    pub scope_concurrency: usize,
    pub default_lookback: chrono::Duration,
    pub watermark_overlap: chrono::Duration,
    /// Scopes still running when the budget elapses are stopped at their next page boundary.
    pub run_budget: Duration,
    pub batch_size: usize,
    pub page_size: usize,
    pub max_pages: u32,
    pub max_request_attempts: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            lock_name: PIPELINE_LOCK_NAME.to_string(),
            lock_ttl: Duration::from_secs(7200),
            min_request_interval: Duration::from_millis(500),
            esi_request_interval: Duration::from_millis(100),
            scope_concurrency: 2,
            default_lookback: chrono::Duration::days(7),
            watermark_overlap: chrono::Duration::hours(1),
            run_budget: Duration::from_secs(6600),
            batch_size: 100,
            page_size: 200,
            max_pages: 50,
            max_request_attempts: 5,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Arguments
    /// - `lookup` - Returns the raw value of a variable, or `None` when it is unset
    ///
    /// # Returns
    /// - `Ok(Config)` - All required variables present and all optional ones valid
    /// - `Err(Error::ConfigError)` - A required variable is missing or a value failed to parse
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &str| -> Result<String, ConfigError> {
            lookup(var)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
        };

        let database_url = required("DATABASE_URL")?;
        let contact_email = required("CONTACT_EMAIL")?;
        let valkey_url = lookup("VALKEY_URL").filter(|value| !value.trim().is_empty());

        let defaults = PipelineConfig::default();
        let pipeline = PipelineConfig {
            lock_ttl: Duration::from_secs(parse_or(
                &lookup,
                "PIPELINE_LOCK_TTL_SECS",
                defaults.lock_ttl.as_secs(),
            )?),
            min_request_interval: Duration::from_millis(parse_or(
                &lookup,
                "PIPELINE_MIN_INTERVAL_MS",
                defaults.min_request_interval.as_millis() as u64,
            )?),
            esi_request_interval: Duration::from_millis(parse_or(
                &lookup,
                "PIPELINE_ESI_INTERVAL_MS",
                defaults.esi_request_interval.as_millis() as u64,
            )?),
            scope_concurrency: parse_or(
                &lookup,
                "PIPELINE_SCOPE_CONCURRENCY",
                defaults.scope_concurrency,
            )?
            .max(1),
            default_lookback: chrono::Duration::days(parse_or(
                &lookup,
                "PIPELINE_DEFAULT_LOOKBACK_DAYS",
                defaults.default_lookback.num_days(),
            )?),
            watermark_overlap: chrono::Duration::seconds(parse_or(
                &lookup,
                "PIPELINE_WATERMARK_OVERLAP_SECS",
                defaults.watermark_overlap.num_seconds(),
            )?),
            run_budget: Duration::from_secs(parse_or(
                &lookup,
                "PIPELINE_RUN_BUDGET_SECS",
                defaults.run_budget.as_secs(),
            )?),
            ..defaults
        };

        if pipeline.run_budget >= pipeline.lock_ttl {
            return Err(ConfigError::InvalidEnvValue {
                var: "PIPELINE_RUN_BUDGET_SECS".to_string(),
                reason: format!(
                    "run budget ({}s) must be shorter than the lock TTL ({}s)",
                    pipeline.run_budget.as_secs(),
                    pipeline.lock_ttl.as_secs()
                ),
            }
            .into());
        }

        Ok(Self {
            database_url,
            valkey_url,
            user_agent: format!(
                "tallyman/{} ({})",
                env!("CARGO_PKG_VERSION"),
                contact_email
            ),
            contact_email,
            zkill_url: lookup("ZKILL_URL").unwrap_or_else(|| DEFAULT_ZKILL_URL.to_string()),
            esi_url: lookup("ESI_URL").unwrap_or_else(|| DEFAULT_ESI_URL.to_string()),
            ingest_cron: lookup("PIPELINE_INGEST_CRON")
                .unwrap_or_else(|| ingest::DEFAULT_CRON_EXPRESSION.to_string()),
            retention_days: parse_or(&lookup, "KILLMAIL_RETENTION_DAYS", 365)?,
            pipeline,
        })
    }
}

fn parse_or<F, T>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvValue {
                var: var.to_string(),
                reason: e.to_string(),
            }),
    }
}
