//! Ingestion pipeline server components.
//!
//! Everything needed to pull killmails from zKillboard for the scopes described by active
//! campaigns: configuration, persistence, the pipeline services and the cron scheduler that
//! triggers them.

pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod util;
