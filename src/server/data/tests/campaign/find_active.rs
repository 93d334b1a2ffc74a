//! Tests for CampaignRepository::find_active method.
//!
//! This module verifies the campaign activity window: the active flag, the start date, and the
//! grace period after the end date, along with loading of locations and entities.

use super::*;

/// Tests loading an active campaign with its scope definitions.
///
/// Verifies that locations and tracked entities are attached to the campaign they belong to.
///
/// Expected: Ok with one campaign carrying one location and one entity
#[tokio::test]
async fn loads_scope_definitions() -> Result<(), TestError> {
    let test = TestBuilder::new().with_pipeline_tables().build().await?;
    let campaign = test
        .campaigns()
        .insert_campaign("Home defense", Utc::now() - Duration::days(3))
        .await?;
    test.campaigns()
        .insert_location(campaign.id, LocationKind::Region, 10000002)
        .await?;
    test.campaigns()
        .insert_entity(campaign.id, EntityKind::Alliance, 99000001, None, None)
        .await?;

    let result = CampaignRepository::new(&test.db)
        .find_active(Utc::now())
        .await;

    assert!(result.is_ok(), "Error: {:?}", result);
    let campaigns = result.unwrap();
    assert_eq!(campaigns.len(), 1);

    let found = &campaigns[0];
    assert_eq!(found.id, campaign.id);
    assert_eq!(found.locations.len(), 1);
    assert_eq!(found.locations[0].kind, LocationKind::Region);
    assert_eq!(found.locations[0].id, 10000002);
    assert_eq!(found.entities.len(), 1);
    assert_eq!(found.entities[0].side, EntitySide::Friendly);
    assert!(found.is_location_based());

    Ok(())
}

/// Tests that campaigns outside their window are excluded.
///
/// Verifies that inactive campaigns, campaigns not yet started, and campaigns that ended
/// before the grace period are not returned.
///
/// Expected: Ok with only the campaign inside its window
#[tokio::test]
async fn excludes_campaigns_outside_window() -> Result<(), TestError> {
    let test = TestBuilder::new().with_pipeline_tables().build().await?;
    let now = Utc::now();

    test.campaigns()
        .insert_campaign_with("Paused", now - Duration::days(3), None, false)
        .await?;
    test.campaigns()
        .insert_campaign_with("Upcoming", now + Duration::days(1), None, true)
        .await?;
    test.campaigns()
        .insert_campaign_with(
            "Finished",
            now - Duration::days(10),
            Some(now - END_DATE_GRACE - Duration::hours(1)),
            true,
        )
        .await?;
    let running = test
        .campaigns()
        .insert_campaign_with("Running", now - Duration::days(3), None, true)
        .await?;

    let campaigns = CampaignRepository::new(&test.db).find_active(now).await?;

    assert_eq!(campaigns.len(), 1);
    assert_eq!(campaigns[0].id, running.id);

    Ok(())
}

/// Tests that a recently ended campaign is still active during the grace period.
///
/// Expected: Ok with the ended campaign included
#[tokio::test]
async fn includes_campaign_within_grace() -> Result<(), TestError> {
    let test = TestBuilder::new().with_pipeline_tables().build().await?;
    let now = Utc::now();

    test.campaigns()
        .insert_campaign_with(
            "Just ended",
            now - Duration::days(2),
            Some(now - Duration::hours(2)),
            true,
        )
        .await?;

    let campaigns = CampaignRepository::new(&test.db).find_active(now).await?;

    assert_eq!(campaigns.len(), 1);
    assert!(campaigns[0].end_date.is_some());

    Ok(())
}
