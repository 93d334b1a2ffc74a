//! Tests for ParticipantRepository::delete_except method.

use super::*;

/// Tests removing participants dropped from a corrected killmail.
///
/// Expected: Ok(1) with only the kept character remaining
#[tokio::test]
async fn removes_characters_not_kept() -> Result<(), TestError> {
    let test = TestBuilder::new().with_pipeline_tables().build().await?;
    let record = record(1, "a", Utc::now());
    KillmailRepository::new(&test.db)
        .insert_if_absent(&record)
        .await?;

    let participant_repo = ParticipantRepository::new(&test.db);
    participant_repo
        .upsert_participants(1, &record.participants())
        .await?;

    let victim_id = factory::victim_character_id(1);
    let deleted = participant_repo.delete_except(1, &[victim_id]).await?;

    assert_eq!(deleted, 1);
    let rows = participant_repo.find_by_killmail(1).await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].character_id, victim_id);

    Ok(())
}
