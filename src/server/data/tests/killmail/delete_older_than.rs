//! Tests for KillmailRepository::delete_older_than method.

use super::*;

/// Tests purging killmails before a cutoff.
///
/// Verifies that old killmails and their participants are removed while newer ones remain.
///
/// Expected: Ok(1) with the newer killmail and its participants intact
#[tokio::test]
async fn deletes_killmails_and_participants() -> Result<(), TestError> {
    let test = TestBuilder::new().with_pipeline_tables().build().await?;
    let killmail_repo = KillmailRepository::new(&test.db);
    let participant_repo = ParticipantRepository::new(&test.db);
    let now = Utc::now();

    for record in [
        record(1, "a", now - Duration::days(30)),
        record(2, "b", now - Duration::days(1)),
    ] {
        killmail_repo.insert_if_absent(&record).await?;
        participant_repo
            .upsert_participants(record.killmail_id, &record.participants())
            .await?;
    }

    let deleted = killmail_repo
        .delete_older_than(now - Duration::days(7))
        .await?;

    assert_eq!(deleted, 1);
    assert!(killmail_repo.find_by_upstream_id(1).await?.is_none());
    assert!(participant_repo.find_by_killmail(1).await?.is_empty());
    assert!(killmail_repo.find_by_upstream_id(2).await?.is_some());
    assert_eq!(participant_repo.find_by_killmail(2).await?.len(), 2);

    Ok(())
}

/// Tests purging a killmail that is linked to a campaign.
///
/// Verifies that the campaign link goes with the killmail.
///
/// Expected: Ok(1) and no links left for the campaign
#[tokio::test]
async fn deletes_campaign_links() -> Result<(), TestError> {
    let test = TestBuilder::new().with_pipeline_tables().build().await?;
    let campaign = test
        .campaigns()
        .insert_campaign("Test", Utc::now() - Duration::days(60))
        .await?;
    let killmail_repo = KillmailRepository::new(&test.db);
    let link_repo = CampaignKillmailRepository::new(&test.db);

    killmail_repo
        .insert_if_absent(&record(1, "a", Utc::now() - Duration::days(30)))
        .await?;
    link_repo
        .link(&[CampaignLink {
            campaign_id: campaign.id,
            killmail_id: 1,
            is_loss: false,
        }])
        .await?;

    let deleted = killmail_repo
        .delete_older_than(Utc::now() - Duration::days(7))
        .await?;

    assert_eq!(deleted, 1);
    assert!(link_repo.find_by_campaign(campaign.id).await?.is_empty());

    Ok(())
}

/// Tests that nothing is deleted when every killmail is newer than the cutoff.
///
/// Expected: Ok(0)
#[tokio::test]
async fn nothing_to_delete() -> Result<(), TestError> {
    let test = TestBuilder::new().with_pipeline_tables().build().await?;
    let killmail_repo = KillmailRepository::new(&test.db);

    killmail_repo
        .insert_if_absent(&record(1, "a", Utc::now()))
        .await?;

    let deleted = killmail_repo
        .delete_older_than(Utc::now() - Duration::days(7))
        .await?;

    assert_eq!(deleted, 0);

    Ok(())
}
