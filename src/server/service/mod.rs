//! Service layer for the ingestion pipeline.
//!
//! Services sit between the repositories and the run orchestrator: upstream fetching with
//! rate limiting, scope planning, idempotent persistence, watermark windows, the distributed
//! run lock and retention. [`orchestrator`] ties them together into a single run.

pub mod fetch;
pub mod lock;
pub mod orchestrator;
pub mod planner;
pub mod rate_limit;
pub mod retention;
pub mod retry;
pub mod upsert;
pub mod watermark;
