use std::time::Duration;

use fred::prelude::*;

use super::{
    lua::{ACQUIRE_LOCK_SCRIPT, RELEASE_LOCK_SCRIPT},
    LockToken,
};
use crate::server::error::Error;

const DEFAULT_KEY_PREFIX: &str = "tallyman:lock";

/// Run lock held as a single Valkey key with a native TTL.
#[derive(Clone)]
pub struct RedisLock {
    pool: Pool,
    /// Key namespace (allows isolation between tests sharing one server)
    prefix: String,
}

impl RedisLock {
    pub fn new(pool: Pool) -> Self {
        Self::with_prefix(pool, DEFAULT_KEY_PREFIX.to_string())
    }

    /// Create a lock backend with a custom key prefix (useful for testing)
    pub fn with_prefix(pool: Pool, prefix: String) -> Self {
        Self { pool, prefix }
    }

    fn key(&self, name: &str) -> String {
        format!("{}:{}", self.prefix, name)
    }

    pub async fn acquire(&self, name: &str, ttl: Duration) -> Result<Option<LockToken>, Error> {
        let token = LockToken::generate(name);
        let ttl_ms = ttl.as_millis().max(1) as u64;

        let result: i64 = self
            .pool
            .eval(
                ACQUIRE_LOCK_SCRIPT,
                vec![self.key(name)],
                vec![token.token.clone(), ttl_ms.to_string()],
            )
            .await?;

        Ok((result == 1).then_some(token))
    }

    pub async fn release(&self, token: &LockToken) -> Result<bool, Error> {
        let result: i64 = self
            .pool
            .eval(
                RELEASE_LOCK_SCRIPT,
                vec![self.key(&token.name)],
                vec![token.token.clone()],
            )
            .await?;

        Ok(result == 1)
    }

    /// The key disappears when the TTL elapses, so absence means expired.
    pub async fn is_expired(&self, name: &str) -> Result<bool, Error> {
        let exists: i64 = self.pool.exists(self.key(name)).await?;

        Ok(exists == 0)
    }

    pub async fn force_clear(&self, name: &str) -> Result<bool, Error> {
        let deleted: i64 = self.pool.del(self.key(name)).await?;

        Ok(deleted > 0)
    }
}
