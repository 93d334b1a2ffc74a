//! Tests for LockRepository::delete_expired method.

use super::*;

/// Tests that only an expired lock is removed.
///
/// Expected: Ok(0) while the lease is live, Ok(1) once it has expired
#[tokio::test]
async fn deletes_only_after_expiry() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::PipelineLock)
        .build()
        .await?;
    let lock_repo = LockRepository::new(&test.db);
    let acquired_at = Utc::now();
    let expires_at = acquired_at + Duration::hours(2);

    lock_repo
        .try_insert(TEST_LOCK_NAME, "holder", acquired_at, expires_at)
        .await?;

    assert_eq!(lock_repo.delete_expired(TEST_LOCK_NAME, acquired_at).await?, 0);
    assert_eq!(
        lock_repo
            .delete_expired(TEST_LOCK_NAME, expires_at + Duration::seconds(1))
            .await?,
        1
    );

    Ok(())
}
