//! Cron-based triggers for pipeline runs and retention.
//!
//! The scheduler only decides *when* work happens. Each tick calls into the same services the
//! CLI uses: [`PipelineOrchestrator::run_once`] for ingestion and [`RetentionService::purge`]
//! for the daily purge. A tick that fires while a previous run still holds the lock simply
//! logs the skip.

use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{
    error::Error,
    service::{orchestrator::PipelineOrchestrator, retention::RetentionService},
    util::stop::StopSignal,
};

pub mod config;
pub mod job;

use self::config::retention as retention_config;
use self::job::{ingest_killmails, purge_killmails};

/// Job scheduler for periodic ingestion and retention.
pub struct Scheduler {
    orchestrator: Arc<PipelineOrchestrator>,
    retention: Arc<RetentionService>,
    stop: StopSignal,
    sched: JobScheduler,
}

impl Scheduler {
    /// Creates a new instance of [`Scheduler`].
    ///
    /// # Arguments
    /// - `orchestrator` - Pipeline invoked on every ingest tick
    /// - `retention` - Purge invoked on every retention tick
    /// - `stop` - Passed to every run so shutdown stops an in-flight run at a page boundary
    ///
    /// # Returns
    /// - `Ok(Scheduler)` - Successfully created scheduler instance
    /// - `Err(Error)` - Failed to initialize the underlying job scheduler
    pub async fn new(
        orchestrator: Arc<PipelineOrchestrator>,
        retention: Arc<RetentionService>,
        stop: StopSignal,
    ) -> Result<Self, Error> {
        let sched = JobScheduler::new().await?;
        Ok(Self {
            orchestrator,
            retention,
            stop,
            sched,
        })
    }

    /// Registers the ingest and retention jobs and starts the scheduler.
    ///
    /// # Arguments
    /// - `ingest_cron` - Cron expression for pipeline runs
    ///
    /// # Returns
    /// - `Ok(())` - Jobs registered and scheduler started
    /// - `Err(Error)` - Invalid cron expression or scheduler error
    pub async fn start(&mut self, ingest_cron: &str) -> Result<(), Error> {
        let orchestrator = self.orchestrator.clone();
        let stop = self.stop.clone();
        self.schedule_job(ingest_cron, "killmail ingest", move || {
            ingest_killmails(orchestrator.clone(), stop.clone())
        })
        .await?;

        let retention = self.retention.clone();
        self.schedule_job(
            retention_config::CRON_EXPRESSION,
            "killmail retention",
            move || purge_killmails(retention.clone()),
        )
        .await?;

        self.sched.start().await?;

        tracing::info!("Scheduler started, ingesting on \"{}\"", ingest_cron);

        Ok(())
    }

    /// Stop firing jobs. A run already in progress is not awaited.
    pub async fn shutdown(&mut self) -> Result<(), Error> {
        self.sched.shutdown().await?;
        Ok(())
    }

    /// Schedules a recurring job with the specified cron expression.
    ///
    /// On execution, the job logs the message returned by `function` on success or the error.
    ///
    /// # Arguments
    /// - `cron` - Cron expression defining when the job should run (e.g., "0 0 * * * *" for hourly)
    /// - `name` - Human-readable name for the job (used in log messages)
    /// - `function` - Async job body returning a short result description
    ///
    /// # Returns
    /// - `Ok(())` - Job successfully registered with the scheduler
    /// - `Err(Error)` - Failed to create or add the job (invalid cron expression or scheduler error)
    pub async fn schedule_job<F, Fut>(
        &mut self,
        cron: &str,
        name: &str,
        function: F,
    ) -> Result<(), Error>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<String, Error>> + Send + 'static,
    {
        let name = name.to_string();
        let function = Arc::new(function);

        self.sched
            .add(Job::new_async(cron, move |_, _| {
                let name = name.clone();
                let function = Arc::clone(&function);

                Box::pin(async move {
                    tracing::debug!("Running {} job", name);
                    match function().await {
                        Ok(message) => tracing::info!("Finished {} job: {}", name, message),
                        Err(e) => tracing::error!("Error running {} job: {:?}", name, e),
                    }
                })
            })?)
            .await?;

        Ok(())
    }
}
