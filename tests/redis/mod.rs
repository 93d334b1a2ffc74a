use std::time::Duration;

use tallyman::server::service::lock::{LockCoordinator, RedisLock};
use tallyman_test_utils::{constant::TEST_LOCK_NAME, prelude::*, RedisTest};

mod lock;

fn coordinator(redis: &RedisTest) -> LockCoordinator {
    LockCoordinator::Redis(RedisLock::with_prefix(
        redis.redis_pool.clone(),
        redis.prefix(),
    ))
}
