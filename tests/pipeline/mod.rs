use std::time::Duration;

use tallyman::server::{
    config::PipelineConfig,
    model::pipeline::{RunOutcome, RunSummary},
    service::{
        lock::{DatabaseLock, LockCoordinator},
        orchestrator::{PipelineOrchestrator, UpstreamUrls},
    },
};
use tallyman_test_utils::{constant::TEST_USER_AGENT, TestContext};

mod entity_scopes;
mod idempotence;
mod lookback;

fn orchestrator(test: &TestContext) -> PipelineOrchestrator {
    PipelineOrchestrator::new(
        test.db.clone(),
        LockCoordinator::Database(DatabaseLock::new(test.db.clone())),
        reqwest::Client::builder()
            .user_agent(TEST_USER_AGENT)
            .build()
            .unwrap(),
        UpstreamUrls {
            zkill: test.server_url(),
            esi: test.server_url(),
        },
        PipelineConfig {
            min_request_interval: Duration::from_millis(1),
            esi_request_interval: Duration::from_millis(1),
            max_request_attempts: 1,
            ..Default::default()
        },
    )
}

fn completed(outcome: RunOutcome) -> RunSummary {
    match outcome {
        RunOutcome::Completed(summary) => summary,
        RunOutcome::AlreadyRunning => panic!("expected the run to complete"),
    }
}
