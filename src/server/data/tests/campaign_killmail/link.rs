//! Tests for CampaignKillmailRepository::link method.

use super::*;

/// Tests linking one killmail to two campaigns.
///
/// Verifies that each campaign sees the killmail with its own loss flag.
///
/// Expected: Ok with one link per campaign
#[tokio::test]
async fn links_killmail_to_each_campaign() -> Result<(), TestError> {
    let test = TestBuilder::new().with_pipeline_tables().build().await?;
    let first = test.campaigns().insert_campaign("First", Utc::now()).await?;
    let second = test.campaigns().insert_campaign("Second", Utc::now()).await?;
    KillmailRepository::new(&test.db)
        .insert_if_absent(&record(1, "a", Utc::now()))
        .await?;

    let link_repo = CampaignKillmailRepository::new(&test.db);
    link_repo
        .link(&[
            CampaignLink {
                campaign_id: first.id,
                killmail_id: 1,
                is_loss: true,
            },
            CampaignLink {
                campaign_id: second.id,
                killmail_id: 1,
                is_loss: false,
            },
        ])
        .await?;

    let first_links = link_repo.find_by_campaign(first.id).await?;
    assert_eq!(first_links.len(), 1);
    assert!(first_links[0].is_loss);

    let second_links = link_repo.find_by_campaign(second.id).await?;
    assert_eq!(second_links.len(), 1);
    assert!(!second_links[0].is_loss);

    Ok(())
}

/// Tests linking the same pair twice.
///
/// Verifies that the existing link is updated rather than duplicated.
///
/// Expected: Ok with a single link carrying the latest loss flag
#[tokio::test]
async fn relinking_updates_loss_flag() -> Result<(), TestError> {
    let test = TestBuilder::new().with_pipeline_tables().build().await?;
    let campaign = test.campaigns().insert_campaign("Test", Utc::now()).await?;
    KillmailRepository::new(&test.db)
        .insert_if_absent(&record(1, "a", Utc::now()))
        .await?;

    let link_repo = CampaignKillmailRepository::new(&test.db);
    for is_loss in [false, true] {
        link_repo
            .link(&[CampaignLink {
                campaign_id: campaign.id,
                killmail_id: 1,
                is_loss,
            }])
            .await?;
    }

    let links = link_repo.find_by_campaign(campaign.id).await?;
    assert_eq!(links.len(), 1);
    assert!(links[0].is_loss);

    Ok(())
}

/// Tests linking an empty slice.
///
/// Expected: Ok without touching the table
#[tokio::test]
async fn empty_links_is_noop() -> Result<(), TestError> {
    let test = TestBuilder::new().with_pipeline_tables().build().await?;

    let result = CampaignKillmailRepository::new(&test.db).link(&[]).await;

    assert!(result.is_ok());

    Ok(())
}
