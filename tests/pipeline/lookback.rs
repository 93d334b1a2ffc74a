use chrono::{Duration, Utc};
use entity::sea_orm_active_enums::LocationKind;
use tallyman::server::{
    model::pipeline::RunOptions,
    util::{stop::StopSignal, time::months_between},
};
use tallyman_test_utils::prelude::*;

use super::{completed, orchestrator};

/// Expect an explicit lookback beyond a week to walk calendar months, ignoring the watermark
#[tokio::test]
async fn deep_lookback_walks_months() -> Result<(), TestError> {
    let now = Utc::now();

    let mut test = TestBuilder::new()
        .with_pipeline_tables()
        .with_location_campaign(
            "Jita",
            now - Duration::days(90),
            LocationKind::System,
            TEST_SYSTEM_ID,
        )
        .build()
        .await?;

    let months = months_between(now - Duration::days(40), now);
    for (index, (year, month)) in months.iter().copied().enumerate() {
        // Only the newest month has a kill; older months answer with an empty page
        let entries = if index == 0 {
            vec![factory::zkill_entry(1, "a", now - Duration::hours(1))]
        } else {
            Vec::new()
        };
        let mock = test.upstream().create_zkill_month_endpoint(
            "systemID/30000142",
            year,
            month,
            1,
            entries,
            1,
        );
        test.track_mock(mock);
    }

    let summary = completed(
        orchestrator(&test)
            .run_once(
                RunOptions {
                    lookback_days: Some(40),
                    force: false,
                },
                StopSignal::never(),
            )
            .await
            .unwrap(),
    );

    assert_eq!(summary.scopes_succeeded, 1);
    assert_eq!(summary.inserted, 1);
    test.assert_mocks();

    Ok(())
}
