//! Tests for KillmailRepository::upsert_killmail method.

use super::*;

/// Tests overwriting a killmail in place.
///
/// Verifies that an upstream correction replaces the stored content without adding a row.
///
/// Expected: Ok with the new hash and value stored under the same row ID
#[tokio::test]
async fn overwrites_existing_killmail() -> Result<(), TestError> {
    let test = TestBuilder::new().with_pipeline_tables().build().await?;
    let killmail_repo = KillmailRepository::new(&test.db);

    killmail_repo
        .insert_if_absent(&record(1, "a", Utc::now()))
        .await?;
    let original = killmail_repo.find_by_upstream_id(1).await?.unwrap();

    let mut corrected = record(1, "b", Utc::now());
    corrected.total_value = 42.0;
    killmail_repo.upsert_killmail(&corrected).await?;

    let stored = killmail_repo.find_by_upstream_id(1).await?.unwrap();
    assert_eq!(stored.id, original.id);
    assert_eq!(stored.content_hash, "b");
    assert_eq!(stored.total_value, 42.0);

    Ok(())
}
