//! Tallyman: killmail ingestion for EVE Online campaign tracking.

pub mod server;
