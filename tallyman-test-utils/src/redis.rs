use fred::prelude::*;

use crate::{constant::TEST_LOCK_NAME, TestError};

/// Valkey test setup with automatic cleanup
///
/// Manages a connection pool and a unique key prefix so tests running in parallel against
/// one server never see each other's keys. The [`TEST_LOCK_NAME`] key under the prefix is
/// removed on drop.
pub struct RedisTest {
    pub redis_pool: Pool,
    prefix: String,
}

impl RedisTest {
    /// Connect to the local test server with a fresh key prefix
    pub async fn new() -> Result<Self, TestError> {
        let redis_config = Config::from_url("redis://127.0.0.1:6379")?;
        let redis_pool = Pool::new(redis_config, None, None, None, 5)?;
        redis_pool.init().await?;

        let prefix = Self::generate_unique_prefix();

        Ok(RedisTest { redis_pool, prefix })
    }

    /// Unique key prefix for this test instance
    pub fn prefix(&self) -> String {
        self.prefix.clone()
    }

    /// Generate a unique prefix using timestamp and thread ID
    fn generate_unique_prefix() -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        use std::time::{SystemTime, UNIX_EPOCH};

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or_default();

        let thread_id = std::thread::current().id();

        let mut hasher = DefaultHasher::new();
        timestamp.hash(&mut hasher);
        thread_id.hash(&mut hasher);
        let hash = hasher.finish();

        format!("test:{}:{:x}:lock", timestamp, hash)
    }
}

impl Drop for RedisTest {
    fn drop(&mut self) {
        // Spawn instead of blocking to avoid "runtime within runtime" errors
        let pool = self.redis_pool.clone();
        let key = format!("{}:{}", self.prefix, TEST_LOCK_NAME);

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                let _: Result<(), fred::error::Error> = pool.del(&key).await;
            });
        }
    }
}
