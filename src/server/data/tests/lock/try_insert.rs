//! Tests for LockRepository::try_insert and delete_with_token methods.

use super::*;

/// Tests that only the first insert for a name succeeds.
///
/// Expected: Ok(true) then Ok(false), with the first token stored
#[tokio::test]
async fn second_insert_is_rejected() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::PipelineLock)
        .build()
        .await?;
    let lock_repo = LockRepository::new(&test.db);
    let now = Utc::now();

    let first = lock_repo
        .try_insert(TEST_LOCK_NAME, "first", now, now + Duration::hours(2))
        .await?;
    let second = lock_repo
        .try_insert(TEST_LOCK_NAME, "second", now, now + Duration::hours(2))
        .await?;

    assert!(first);
    assert!(!second);
    assert_eq!(lock_repo.find(TEST_LOCK_NAME).await?.unwrap().token, "first");

    Ok(())
}

/// Tests that a lock is only deleted by the token holding it.
///
/// Expected: Ok(false) for a foreign token, Ok(true) for the holder
#[tokio::test]
async fn delete_requires_matching_token() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::PipelineLock)
        .build()
        .await?;
    let lock_repo = LockRepository::new(&test.db);
    let now = Utc::now();

    lock_repo
        .try_insert(TEST_LOCK_NAME, "holder", now, now + Duration::hours(2))
        .await?;

    assert!(!lock_repo.delete_with_token(TEST_LOCK_NAME, "other").await?);
    assert!(lock_repo.delete_with_token(TEST_LOCK_NAME, "holder").await?);
    assert!(lock_repo.find(TEST_LOCK_NAME).await?.is_none());

    Ok(())
}
