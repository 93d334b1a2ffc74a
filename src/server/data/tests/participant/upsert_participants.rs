//! Tests for ParticipantRepository::upsert_participants method.

use super::*;

/// Tests inserting participants with their roles.
///
/// Expected: Ok with a victim row and a final-blow row
#[tokio::test]
async fn inserts_participants_with_roles() -> Result<(), TestError> {
    let test = TestBuilder::new().with_pipeline_tables().build().await?;
    let record = record(1, "a", Utc::now());
    KillmailRepository::new(&test.db)
        .insert_if_absent(&record)
        .await?;

    let participant_repo = ParticipantRepository::new(&test.db);
    participant_repo
        .upsert_participants(1, &record.participants())
        .await?;

    let rows = participant_repo.find_by_killmail(1).await?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].character_id, factory::victim_character_id(1));
    assert_eq!(rows[0].role, ParticipantRole::Victim);
    assert_eq!(rows[1].character_id, factory::attacker_character_id(1));
    assert_eq!(rows[1].role, ParticipantRole::FinalBlow);

    Ok(())
}

/// Tests that upserting the same participants twice updates rather than duplicates.
///
/// Expected: Ok with two rows and the updated damage
#[tokio::test]
async fn repeated_upsert_updates_rows() -> Result<(), TestError> {
    let test = TestBuilder::new().with_pipeline_tables().build().await?;
    let mut record = record(1, "a", Utc::now());
    KillmailRepository::new(&test.db)
        .insert_if_absent(&record)
        .await?;

    let participant_repo = ParticipantRepository::new(&test.db);
    participant_repo
        .upsert_participants(1, &record.participants())
        .await?;

    record.attackers[0].damage_done = 800;
    participant_repo
        .upsert_participants(1, &record.participants())
        .await?;

    let rows = participant_repo.find_by_killmail(1).await?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].damage, 800);

    Ok(())
}
