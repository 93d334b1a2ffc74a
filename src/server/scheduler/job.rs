//! Job bodies run by the scheduler.

use std::sync::Arc;

use crate::server::{
    error::Error,
    model::pipeline::{RunOptions, RunOutcome},
    service::{orchestrator::PipelineOrchestrator, retention::RetentionService},
    util::stop::StopSignal,
};

/// Run the pipeline once with watermark-driven windows.
pub async fn ingest_killmails(
    orchestrator: Arc<PipelineOrchestrator>,
    stop: StopSignal,
) -> Result<String, Error> {
    match orchestrator.run_once(RunOptions::default(), stop).await? {
        RunOutcome::AlreadyRunning => Ok("skipped, previous run still holds the lock".to_string()),
        RunOutcome::Completed(summary) => {
            if summary.is_total_failure() {
                tracing::warn!(
                    "Every planned scope failed ({} scope(s))",
                    summary.scopes_planned
                );
            }

            Ok(format!(
                "{} inserted, {} updated across {}/{} scope(s)",
                summary.inserted,
                summary.updated,
                summary.scopes_succeeded,
                summary.scopes_planned
            ))
        }
    }
}

/// Delete killmails outside the retention window.
pub async fn purge_killmails(retention: Arc<RetentionService>) -> Result<String, Error> {
    let deleted = retention.purge().await?;

    Ok(format!("{} killmail(s) purged", deleted))
}
