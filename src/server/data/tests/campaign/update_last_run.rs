//! Tests for CampaignRepository::update_last_run method.

use super::*;

/// Tests stamping last_run on a subset of campaigns.
///
/// Verifies that only the listed campaigns are updated.
///
/// Expected: Ok(1) and last_run set on the listed campaign only
#[tokio::test]
async fn updates_only_listed_campaigns() -> Result<(), TestError> {
    let test = TestBuilder::new().with_pipeline_tables().build().await?;
    let fed = test
        .campaigns()
        .insert_campaign("Fed", Utc::now() - Duration::days(1))
        .await?;
    let other = test
        .campaigns()
        .insert_campaign("Other", Utc::now() - Duration::days(1))
        .await?;

    let campaign_repo = CampaignRepository::new(&test.db);
    let updated = campaign_repo.update_last_run(&[fed.id], Utc::now()).await?;

    assert_eq!(updated, 1);
    assert!(campaign_repo.find_by_id(fed.id).await?.unwrap().last_run.is_some());
    assert!(campaign_repo.find_by_id(other.id).await?.unwrap().last_run.is_none());

    Ok(())
}

/// Tests that an empty campaign list is a no-op.
///
/// Expected: Ok(0)
#[tokio::test]
async fn empty_list_is_noop() -> Result<(), TestError> {
    let test = TestBuilder::new().with_pipeline_tables().build().await?;

    let updated = CampaignRepository::new(&test.db)
        .update_last_run(&[], Utc::now())
        .await?;

    assert_eq!(updated, 0);

    Ok(())
}
