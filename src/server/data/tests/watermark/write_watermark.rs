//! Tests for WatermarkRepository::write_watermark method.
//!
//! This module verifies watermark storage and that watermarks never move backwards.

use super::*;

/// Whole-second instant, matching what the database round trips.
fn at(hours_ago: i64) -> chrono::DateTime<Utc> {
    let instant = Utc::now() - Duration::hours(hours_ago);
    chrono::DateTime::from_timestamp(instant.timestamp(), 0).unwrap()
}

/// Tests writing and reading back a watermark.
///
/// Expected: Ok with the written instant returned by read_watermark
#[tokio::test]
async fn stores_new_watermark() -> Result<(), TestError> {
    let test = TestBuilder::new().with_pipeline_tables().build().await?;
    let watermark_repo = WatermarkRepository::new(&test.db);

    let instant = at(2);

    let stored = watermark_repo.write_watermark("systemID:30000142", instant).await?;

    assert_eq!(stored, instant);
    assert_eq!(
        watermark_repo.read_watermark("systemID:30000142").await?,
        Some(instant)
    );

    Ok(())
}

/// Tests advancing an existing watermark.
///
/// Expected: Ok with the newer instant stored
#[tokio::test]
async fn advances_watermark() -> Result<(), TestError> {
    let test = TestBuilder::new().with_pipeline_tables().build().await?;
    let watermark_repo = WatermarkRepository::new(&test.db);
    let older = at(5);
    let newer = at(1);

    watermark_repo.write_watermark("allianceID:99000001", older).await?;
    watermark_repo.write_watermark("allianceID:99000001", newer).await?;

    assert_eq!(
        watermark_repo.read_watermark("allianceID:99000001").await?,
        Some(newer)
    );

    Ok(())
}

/// Tests that an older instant never replaces a newer watermark.
///
/// Expected: Ok with the existing watermark returned and kept
#[tokio::test]
async fn never_moves_backwards() -> Result<(), TestError> {
    let test = TestBuilder::new().with_pipeline_tables().build().await?;
    let watermark_repo = WatermarkRepository::new(&test.db);
    let newer = at(1);

    watermark_repo.write_watermark("systemID:30000142", newer).await?;
    let stored = watermark_repo
        .write_watermark("systemID:30000142", at(5))
        .await?;

    assert_eq!(stored, newer);
    assert_eq!(
        watermark_repo.read_watermark("systemID:30000142").await?,
        Some(newer)
    );

    Ok(())
}

/// Tests reading a scope that has never been ingested.
///
/// Expected: Ok(None)
#[tokio::test]
async fn missing_watermark_is_none() -> Result<(), TestError> {
    let test = TestBuilder::new().with_pipeline_tables().build().await?;

    let result = WatermarkRepository::new(&test.db)
        .read_watermark("regionID:10000002")
        .await?;

    assert!(result.is_none());

    Ok(())
}
