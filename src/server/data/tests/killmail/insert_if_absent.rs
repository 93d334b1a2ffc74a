//! Tests for KillmailRepository::insert_if_absent method.

use super::*;

/// Tests inserting a new killmail.
///
/// Expected: Ok(true) and the row stored with the record's fields
#[tokio::test]
async fn inserts_new_killmail() -> Result<(), TestError> {
    let test = TestBuilder::new().with_pipeline_tables().build().await?;
    let killmail_repo = KillmailRepository::new(&test.db);

    let inserted = killmail_repo
        .insert_if_absent(&record(1, "a", Utc::now()))
        .await?;

    assert!(inserted);
    let stored = killmail_repo.find_by_upstream_id(1).await?.unwrap();
    assert_eq!(stored.content_hash, "a");
    assert_eq!(stored.solar_system_id, TEST_SYSTEM_ID);
    assert_eq!(stored.attacker_count, 1);

    Ok(())
}

/// Tests that an existing killmail is left untouched.
///
/// Verifies that a second insert with a different hash neither fails nor overwrites.
///
/// Expected: Ok(false) and the original hash kept
#[tokio::test]
async fn keeps_existing_killmail() -> Result<(), TestError> {
    let test = TestBuilder::new().with_pipeline_tables().build().await?;
    let killmail_repo = KillmailRepository::new(&test.db);

    killmail_repo
        .insert_if_absent(&record(1, "a", Utc::now()))
        .await?;
    let inserted = killmail_repo
        .insert_if_absent(&record(1, "b", Utc::now()))
        .await?;

    assert!(!inserted);
    let stored = killmail_repo.find_by_upstream_id(1).await?.unwrap();
    assert_eq!(stored.content_hash, "a");

    Ok(())
}
