//! Distributed run lock.
//!
//! Only one pipeline run may be active at a time across every process pointed at the same
//! store. The lock is a named, token-owned lease with a TTL: a crashed run's lock simply expires
//! and the next run reclaims it.
//!
//! Two interchangeable backends exist. Valkey is used when configured (`SET NX PX` plus a
//! compare-and-delete script); otherwise the lock is a row in `pipeline_lock` guarded by its
//! unique name.

mod database;
mod lua;
mod redis;

pub use database::DatabaseLock;
pub use redis::RedisLock;

use std::time::Duration;

use rand::Rng;

use crate::server::error::Error;

/// Proof of holding a named lock. Releasing requires the same token that acquired it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockToken {
    pub name: String,
    pub token: String,
}

impl LockToken {
    fn generate(name: &str) -> Self {
        Self {
            name: name.to_string(),
            token: format!("{:032x}", rand::rng().random::<u128>()),
        }
    }
}

#[derive(Clone)]
pub enum LockCoordinator {
    Redis(RedisLock),
    Database(DatabaseLock),
}

impl LockCoordinator {
    /// Try to take the named lock.
    ///
    /// # Arguments
    /// - `name` - Logical lock name
    /// - `ttl` - Lease length; must exceed the longest run
    ///
    /// # Returns
    /// - `Ok(Some(LockToken))` - Lock acquired
    /// - `Ok(None)` - Another holder has an unexpired lock
    /// - `Err(Error)` - The backing store could not be reached
    pub async fn acquire(&self, name: &str, ttl: Duration) -> Result<Option<LockToken>, Error> {
        let token = match self {
            Self::Redis(lock) => lock.acquire(name, ttl).await?,
            Self::Database(lock) => lock.acquire(name, ttl).await?,
        };

        match &token {
            Some(_) => tracing::debug!(lock = name, "Acquired run lock for {:?}", ttl),
            None => tracing::debug!(lock = name, "Run lock is held elsewhere"),
        }

        Ok(token)
    }

    /// Release a lock this caller holds.
    ///
    /// # Returns
    /// - `Ok(true)` - The lock was released
    /// - `Ok(false)` - The lock had already expired or been taken over; nothing was deleted
    pub async fn release(&self, token: &LockToken) -> Result<bool, Error> {
        let released = match self {
            Self::Redis(lock) => lock.release(token).await?,
            Self::Database(lock) => lock.release(token).await?,
        };

        if !released {
            tracing::warn!(
                lock = %token.name,
                "Run lock was no longer held at release; it expired or was force cleared"
            );
        }

        Ok(released)
    }

    pub async fn is_expired(&self, name: &str) -> Result<bool, Error> {
        match self {
            Self::Redis(lock) => lock.is_expired(name).await,
            Self::Database(lock) => lock.is_expired(name).await,
        }
    }

    /// Delete the named lock regardless of who holds it.
    ///
    /// # Returns
    /// Whether a lock was present.
    pub async fn force_clear(&self, name: &str) -> Result<bool, Error> {
        let cleared = match self {
            Self::Redis(lock) => lock.force_clear(name).await?,
            Self::Database(lock) => lock.force_clear(name).await?,
        };

        if cleared {
            tracing::info!(lock = name, "Cleared run lock");
        }

        Ok(cleared)
    }
}
