use chrono::{Duration, Utc};
use entity::sea_orm_active_enums::EntityKind;
use tallyman::server::{
    data::{
        campaign_killmail::CampaignKillmailRepository, participant::ParticipantRepository,
        watermark::WatermarkRepository,
    },
    model::pipeline::RunOptions,
    util::stop::StopSignal,
};
use tallyman_test_utils::prelude::*;

use super::{completed, orchestrator};

/// Expect a tracked corporation inside a tracked alliance to be fetched only through the
/// alliance scope
#[tokio::test]
async fn alliance_scope_covers_member_corporation() -> Result<(), TestError> {
    let occurred_at = Utc::now() - Duration::minutes(30);

    let test = TestBuilder::new()
        .with_pipeline_tables()
        .with_entity_campaign(
            "Alliance war",
            Utc::now() - Duration::days(2),
            vec![
                (EntityKind::Alliance, 99000001, None, None),
                (EntityKind::Corporation, 98000001, None, Some(99000001)),
            ],
        )
        .with_zkill_page(
            "allianceID/99000001",
            1,
            vec![factory::zkill_entry(10, "j", occurred_at)],
            1,
        )
        .build()
        .await?;

    let summary = completed(
        orchestrator(&test)
            .run_once(RunOptions::default(), StopSignal::never())
            .await
            .unwrap(),
    );

    assert_eq!(summary.scopes_planned, 1);
    assert_eq!(summary.scopes_succeeded, 1);
    assert_eq!(summary.inserted, 1);

    let participants = ParticipantRepository::new(&test.db)
        .find_by_killmail(10)
        .await?;
    assert_eq!(participants.len(), 2);

    // The tracked alliance lost the ship, so the kill counts as a campaign loss
    let links = CampaignKillmailRepository::new(&test.db)
        .find_by_campaign(1)
        .await?;
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].killmail_id, 10);
    assert!(links[0].is_loss);

    let watermark_repo = WatermarkRepository::new(&test.db);
    assert!(watermark_repo
        .read_watermark("allianceID:99000001")
        .await?
        .is_some());
    assert!(watermark_repo
        .read_watermark("corporationID:98000001")
        .await?
        .is_none());

    test.assert_mocks();

    Ok(())
}

/// Expect one failing scope not to prevent another scope from completing
#[tokio::test]
async fn partial_failure_keeps_other_scopes() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_pipeline_tables()
        .with_entity_campaign(
            "Two corps",
            Utc::now() - Duration::days(2),
            vec![
                (EntityKind::Corporation, 98000001, None, None),
                (EntityKind::Corporation, 98000002, None, None),
            ],
        )
        .with_zkill_page(
            "corporationID/98000001",
            1,
            vec![factory::zkill_entry(
                11,
                "k",
                Utc::now() - Duration::minutes(10),
            )],
            1,
        )
        .build()
        .await?;
    let failing = test
        .upstream()
        .create_zkill_status_endpoint("corporationID/98000002", 1, 403, 1);
    test.track_mock(failing);

    let summary = completed(
        orchestrator(&test)
            .run_once(RunOptions::default(), StopSignal::never())
            .await
            .unwrap(),
    );

    assert_eq!(summary.scopes_planned, 2);
    assert_eq!(summary.scopes_succeeded, 1);
    assert_eq!(summary.scopes_failed, 1);
    assert!(!summary.is_total_failure());
    assert_eq!(summary.failures[0].0, "corporationID:98000002");

    let watermark_repo = WatermarkRepository::new(&test.db);
    assert!(watermark_repo
        .read_watermark("corporationID:98000001")
        .await?
        .is_some());
    assert!(watermark_repo
        .read_watermark("corporationID:98000002")
        .await?
        .is_none());

    test.assert_mocks();

    Ok(())
}
