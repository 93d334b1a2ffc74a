//! Data access layer repositories.
//!
//! Repositories are thin wrappers over sea-orm generic over [`sea_orm::ConnectionTrait`], so
//! the same code runs against a pooled connection or inside a transaction. Services never build
//! queries themselves.

pub mod campaign;
pub mod campaign_killmail;
pub mod killmail;
pub mod lock;
pub mod participant;
pub mod run;
pub mod watermark;

#[cfg(test)]
mod tests;
