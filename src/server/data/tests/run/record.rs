//! Tests for RunRepository::record and latest methods.

use super::*;

fn summary(inserted: u64, cancelled: bool) -> RunSummary {
    RunSummary {
        started_at: Utc::now(),
        finished_at: Utc::now(),
        elapsed: Duration::from_millis(1500),
        scopes_planned: 3,
        scopes_succeeded: 2,
        scopes_failed: 1,
        fetched: 12,
        inserted,
        updated: 1,
        skipped: 4,
        cancelled,
        failures: vec![("systemID:30000142".to_string(), "status 404".to_string())],
    }
}

/// Tests persisting a run summary.
///
/// Expected: Ok with every count stored
#[tokio::test]
async fn stores_summary_counts() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::PipelineRun)
        .build()
        .await?;

    let run = RunRepository::new(&test.db)
        .record(&summary(7, false))
        .await?;

    assert_eq!(run.elapsed_ms, 1500);
    assert_eq!(run.scopes_planned, 3);
    assert_eq!(run.scopes_failed, 1);
    assert_eq!(run.records_fetched, 12);
    assert_eq!(run.records_inserted, 7);
    assert!(!run.cancelled);

    Ok(())
}

/// Tests that latest returns the most recently recorded run.
///
/// Expected: Ok(Some) with the second run
#[tokio::test]
async fn latest_returns_newest_run() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::PipelineRun)
        .build()
        .await?;
    let run_repo = RunRepository::new(&test.db);

    run_repo.record(&summary(1, false)).await?;
    run_repo.record(&summary(2, true)).await?;

    let latest = run_repo.latest().await?.unwrap();
    assert_eq!(latest.records_inserted, 2);
    assert!(latest.cancelled);

    Ok(())
}
