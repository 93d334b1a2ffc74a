use super::*;

/// Expect a held lock to reject a second acquire until released
#[tokio::test]
async fn acquire_is_exclusive_until_release() -> Result<(), TestError> {
    let redis = RedisTest::new().await?;
    let lock = coordinator(&redis);

    let token = lock
        .acquire(TEST_LOCK_NAME, Duration::from_secs(60))
        .await
        .unwrap()
        .expect("first acquire should succeed");

    let contended = lock
        .acquire(TEST_LOCK_NAME, Duration::from_secs(60))
        .await
        .unwrap();
    assert!(contended.is_none());

    assert!(lock.release(&token).await.unwrap());

    let reacquired = lock
        .acquire(TEST_LOCK_NAME, Duration::from_secs(60))
        .await
        .unwrap();
    assert!(reacquired.is_some());

    lock.force_clear(TEST_LOCK_NAME).await.unwrap();

    Ok(())
}

/// Expect a release with a stale token to leave the current holder's lock in place
#[tokio::test]
async fn stale_token_cannot_release() -> Result<(), TestError> {
    let redis = RedisTest::new().await?;
    let lock = coordinator(&redis);

    let stale = lock
        .acquire(TEST_LOCK_NAME, Duration::from_secs(60))
        .await
        .unwrap()
        .expect("first acquire should succeed");
    lock.force_clear(TEST_LOCK_NAME).await.unwrap();
    let current = lock
        .acquire(TEST_LOCK_NAME, Duration::from_secs(60))
        .await
        .unwrap()
        .expect("acquire after clear should succeed");

    assert!(!lock.release(&stale).await.unwrap());
    assert!(!lock.is_expired(TEST_LOCK_NAME).await.unwrap());

    assert!(lock.release(&current).await.unwrap());

    Ok(())
}

/// Expect the lock to lapse on its own once the TTL elapses
#[tokio::test]
async fn lock_expires_after_ttl() -> Result<(), TestError> {
    let redis = RedisTest::new().await?;
    let lock = coordinator(&redis);

    lock.acquire(TEST_LOCK_NAME, Duration::from_millis(100))
        .await
        .unwrap()
        .expect("first acquire should succeed");

    tokio::time::sleep(Duration::from_millis(250)).await;

    assert!(lock.is_expired(TEST_LOCK_NAME).await.unwrap());
    let reclaimed = lock
        .acquire(TEST_LOCK_NAME, Duration::from_secs(60))
        .await
        .unwrap();
    assert!(reclaimed.is_some());

    lock.force_clear(TEST_LOCK_NAME).await.unwrap();

    Ok(())
}
