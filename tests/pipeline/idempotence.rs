use chrono::{Duration, Utc};
use entity::sea_orm_active_enums::LocationKind;
use tallyman::server::{
    data::killmail::KillmailRepository, model::pipeline::RunOptions, util::stop::StopSignal,
};
use tallyman_test_utils::prelude::*;

use super::{completed, orchestrator};

/// Expect re-ingesting the same page to change nothing
#[tokio::test]
async fn second_run_skips_stored_killmails() -> Result<(), TestError> {
    let occurred_at = Utc::now() - Duration::minutes(20);

    let test = TestBuilder::new()
        .with_pipeline_tables()
        .with_location_campaign(
            "Jita",
            Utc::now() - Duration::days(1),
            LocationKind::System,
            TEST_SYSTEM_ID,
        )
        .with_zkill_page(
            "systemID/30000142",
            1,
            vec![
                factory::zkill_entry(1, "a", occurred_at),
                factory::zkill_summary(2, "b"),
            ],
            2,
        )
        .with_esi_killmail(2, "b", factory::esi_killmail(2, occurred_at), 1)
        .build()
        .await?;
    let orchestrator = orchestrator(&test);

    let first = completed(
        orchestrator
            .run_once(RunOptions::default(), StopSignal::never())
            .await
            .unwrap(),
    );
    let second = completed(
        orchestrator
            .run_once(RunOptions::default(), StopSignal::never())
            .await
            .unwrap(),
    );

    assert_eq!(first.inserted, 2);
    assert_eq!(second.inserted, 0);
    assert_eq!(second.updated, 0);
    assert_eq!(second.skipped, 2);

    let killmail_repo = KillmailRepository::new(&test.db);
    assert!(killmail_repo.find_by_upstream_id(1).await?.is_some());
    assert!(killmail_repo.find_by_upstream_id(2).await?.is_some());

    // The summary entry is only hydrated once; the second run recognizes its hash
    test.assert_mocks();

    Ok(())
}

/// Expect a changed hash on re-ingest to overwrite the stored killmail
#[tokio::test]
async fn changed_hash_updates_killmail() -> Result<(), TestError> {
    let occurred_at = Utc::now() - Duration::minutes(20);

    let mut test = TestBuilder::new()
        .with_pipeline_tables()
        .with_location_campaign(
            "Jita",
            Utc::now() - Duration::days(1),
            LocationKind::System,
            TEST_SYSTEM_ID,
        )
        .build()
        .await?;
    let orchestrator = orchestrator(&test);

    let original = test.upstream().create_zkill_page_endpoint(
        "systemID/30000142",
        1,
        vec![factory::zkill_entry(1, "a", occurred_at)],
        1,
    );
    completed(
        orchestrator
            .run_once(RunOptions::default(), StopSignal::never())
            .await
            .unwrap(),
    );
    original.assert();
    original.remove();

    let corrected = test.upstream().create_zkill_page_endpoint(
        "systemID/30000142",
        1,
        vec![factory::zkill_entry(1, "a2", occurred_at)],
        1,
    );
    let summary = completed(
        orchestrator
            .run_once(RunOptions::default(), StopSignal::never())
            .await
            .unwrap(),
    );
    corrected.assert();

    assert_eq!(summary.updated, 1);
    let stored = KillmailRepository::new(&test.db)
        .find_by_upstream_id(1)
        .await?
        .unwrap();
    assert_eq!(stored.content_hash, "a2");

    Ok(())
}
