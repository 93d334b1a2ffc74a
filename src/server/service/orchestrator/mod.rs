//! Pipeline orchestration.
//!
//! [`PipelineOrchestrator::run_once`] is the single entry point for an ingestion run. It takes
//! the run lock, plans the deduplicated scopes for every active campaign, pages each scope
//! through the shared rate limiters with bounded parallelism, and finalizes: watermarks for
//! completed scopes, campaign `last_run`, lock release and the persisted run summary.
//!
//! Scopes that stop at the page cap keep what they persisted but are reported failed and keep
//! their watermark, so the next run fetches the same window again instead of skipping past it.
//!
//! The orchestrator knows nothing about cron or the CLI; both call `run_once`.

pub mod scope;
pub mod state;


use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use futures::{stream, StreamExt};
use sea_orm::DatabaseConnection;
use tokio::time::Instant;

use crate::server::{
    config::PipelineConfig,
    data::{campaign::CampaignRepository, run::RunRepository, watermark::WatermarkRepository},
    error::Error,
    model::{
        campaign::CampaignConfig,
        pipeline::{FetchPlan, RunOptions, RunOutcome, RunSummary, Scope},
    },
    service::{
        fetch::{esi::EsiClient, zkill::ZkillClient, UpstreamHttp},
        lock::{LockCoordinator, LockToken},
        planner,
        rate_limit::RateLimiter,
        upsert::Upserter,
        watermark::{self, WatermarkPolicy},
    },
    util::stop::{stop_channel, StopSignal},
};

use scope::{ScopeJob, ScopeOutcome, ScopeResult, ScopeRunner};
use state::PipelineState;

/// Upstream endpoints a run talks to.
#[derive(Debug, Clone)]
pub struct UpstreamUrls {
    pub zkill: String,
    pub esi: String,
}

pub struct PipelineOrchestrator {
    db: DatabaseConnection,
    lock: LockCoordinator,
    http: reqwest::Client,
    urls: UpstreamUrls,
    config: PipelineConfig,
}

impl PipelineOrchestrator {
    pub fn new(
        db: DatabaseConnection,
        lock: LockCoordinator,
        http: reqwest::Client,
        urls: UpstreamUrls,
        config: PipelineConfig,
    ) -> Self {
        Self {
            db,
            lock,
            http,
            urls,
            config,
        }
    }

    pub fn lock(&self) -> &LockCoordinator {
        &self.lock
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Execute one ingestion run.
    ///
    /// # Arguments
    /// - `options` - Explicit lookback and force-unlock flags
    /// - `stop` - External stop request (Ctrl-C, scheduler shutdown); the run's time budget
    ///   stops it as well
    ///
    /// # Returns
    /// - `Ok(RunOutcome::AlreadyRunning)` - Another run holds the lock; nothing was done
    /// - `Ok(RunOutcome::Completed(summary))` - The run finished, possibly with failed or
    ///   cancelled scopes
    /// - `Err(Error)` - The lock store was unreachable, or campaigns could not be loaded
    pub async fn run_once(
        &self,
        options: RunOptions,
        stop: StopSignal,
    ) -> Result<RunOutcome, Error> {
        let lock_name = self.config.lock_name.as_str();
        let mut state = PipelineState::Idle;

        state.transition(PipelineState::Locking)?;
        if options.force {
            self.lock.force_clear(lock_name).await?;
        }

        let Some(token) = self.lock.acquire(lock_name, self.config.lock_ttl).await? else {
            state.transition(PipelineState::Aborted)?;
            tracing::info!(lock = lock_name, "Another run holds the lock, skipping this run");
            state.transition(PipelineState::Idle)?;
            return Ok(RunOutcome::AlreadyRunning);
        };

        let started_at = Utc::now();
        let clock = Instant::now();

        // Stops on the caller's request or when the run budget elapses
        let (run_stop_handle, run_stop) = stop_channel();
        if stop.is_stopped() {
            run_stop_handle.stop();
        }
        let budget = self.config.run_budget;
        let watcher = tokio::spawn(async move {
            let mut stop = stop;
            tokio::select! {
                _ = stop.stopped() => {
                    tracing::info!("Stop requested, finishing at the next page boundary");
                }
                _ = tokio::time::sleep(budget) => {
                    tracing::warn!("Run budget of {:?} elapsed, stopping", budget);
                }
            }
            run_stop_handle.stop();
        });

        let executed = self
            .execute(&mut state, &options, run_stop.clone(), started_at)
            .await;
        watcher.abort();

        state.transition(PipelineState::Finalizing)?;

        let (plans, results, error) = match executed {
            Ok((plans, results)) => (plans, results, None),
            Err(e) => {
                tracing::error!("Run failed before scopes completed: {}", e);
                (Vec::new(), Vec::new(), Some(e))
            }
        };

        let summary = self
            .finalize(
                &token,
                &plans,
                &results,
                started_at,
                clock,
                run_stop.is_stopped(),
            )
            .await;

        state.transition(PipelineState::Idle)?;

        match error {
            Some(e) => Err(e),
            None => Ok(RunOutcome::Completed(summary)),
        }
    }

    /// Planning, fetching and persisting.
    async fn execute(
        &self,
        state: &mut PipelineState,
        options: &RunOptions,
        stop: StopSignal,
        now: DateTime<Utc>,
    ) -> Result<(Vec<(FetchPlan, Option<DateTime<Utc>>)>, Vec<ScopeResult>), Error> {
        state.transition(PipelineState::Planning)?;

        let campaigns = CampaignRepository::new(&self.db).find_active(now).await?;
        let plans = planner::plan(&campaigns);

        tracing::info!(
            "Planned {} scope(s) for {} active campaign(s)",
            plans.len(),
            campaigns.len()
        );

        if plans.is_empty() {
            return Ok((Vec::new(), Vec::new()));
        }

        let watermark_repo = WatermarkRepository::new(&self.db);
        let policy = WatermarkPolicy::new(
            self.config.watermark_overlap,
            self.config.default_lookback,
        );

        let mut planned = Vec::with_capacity(plans.len());
        let mut jobs = Vec::with_capacity(plans.len());
        for plan in plans {
            let stored = watermark_repo.read_watermark(&plan.scope.key()).await?;
            jobs.push(ScopeJob {
                scope: plan.scope,
                since: policy.since_for(&plan, stored, options, now),
                campaign_ids: plan.campaign_ids.clone(),
            });
            planned.push((plan, stored));
        }

        let campaigns: HashMap<i32, CampaignConfig> = campaigns
            .into_iter()
            .map(|campaign| (campaign.id, campaign))
            .collect();

        state.transition(PipelineState::Fetching)?;

        // One limiter per upstream, shared by every scope in this run
        let zkill = ZkillClient::new(
            UpstreamHttp::new(
                self.http.clone(),
                Arc::new(RateLimiter::new(self.config.min_request_interval)),
                self.config.max_request_attempts,
            ),
            &self.urls.zkill,
            self.config.page_size,
            self.config.max_pages,
        );
        let esi = EsiClient::new(
            UpstreamHttp::new(
                self.http.clone(),
                Arc::new(RateLimiter::new(self.config.esi_request_interval)),
                self.config.max_request_attempts,
            ),
            &self.urls.esi,
        );
        let upserter = Upserter::new(self.db.clone(), self.config.batch_size);

        let runner = ScopeRunner {
            zkill: &zkill,
            esi: &esi,
            upserter: &upserter,
            campaigns: &campaigns,
            stop,
        };
        let runner = &runner;

        let results: Vec<ScopeResult> = stream::iter(jobs)
            .map(move |job| runner.run(job, now))
            .buffer_unordered(self.config.scope_concurrency.max(1))
            .collect()
            .await;

        Ok((planned, results))
    }

    /// Persist everything a run learned and release the lock.
    ///
    /// Steps run in order and each failure is logged without skipping the later steps, so the
    /// lock is always released.
    async fn finalize(
        &self,
        token: &LockToken,
        plans: &[(FetchPlan, Option<DateTime<Utc>>)],
        results: &[ScopeResult],
        started_at: DateTime<Utc>,
        clock: Instant,
        stopped: bool,
    ) -> RunSummary {
        let by_scope: HashMap<Scope, &(FetchPlan, Option<DateTime<Utc>>)> =
            plans.iter().map(|entry| (entry.0.scope, entry)).collect();

        let mut failures = Vec::new();
        let mut fed_campaigns = Vec::new();

        let watermark_repo = WatermarkRepository::new(&self.db);
        for result in results {
            let key = result.scope.key();

            match &result.outcome {
                ScopeOutcome::Completed => {}
                ScopeOutcome::Failed(reason) => {
                    failures.push((key, reason.clone()));
                    continue;
                }
                ScopeOutcome::Cancelled => {
                    failures.push((key, "cancelled".to_string()));
                    continue;
                }
                ScopeOutcome::Truncated => {
                    failures.push((key, "page cap reached".to_string()));
                    continue;
                }
            }

            let Some((plan, stored)) = by_scope.get(&result.scope).copied() else {
                continue;
            };
            fed_campaigns.extend(plan.campaign_ids.iter().copied());

            if let Some(next) = watermark::advance(*stored, result.latest_seen) {
                if Some(next) != *stored {
                    if let Err(e) = watermark_repo.write_watermark(&key, next).await {
                        tracing::warn!(scope = %key, "Failed to write watermark: {}", e);
                    }
                }
            }
        }

        fed_campaigns.sort_unstable();
        fed_campaigns.dedup();

        let finished_at = Utc::now();

        if let Err(e) = CampaignRepository::new(&self.db)
            .update_last_run(&fed_campaigns, finished_at)
            .await
        {
            tracing::warn!("Failed to update campaign last run: {}", e);
        }

        if let Err(e) = self.lock.release(token).await {
            tracing::error!(lock = %token.name, "Failed to release run lock: {}", e);
        }

        let scopes_succeeded = results.iter().filter(|r| r.is_completed()).count();
        let summary = RunSummary {
            started_at,
            finished_at,
            elapsed: clock.elapsed(),
            scopes_planned: plans.len(),
            scopes_succeeded,
            scopes_failed: plans.len() - scopes_succeeded,
            fetched: results.iter().map(|r| r.fetched).sum(),
            inserted: results.iter().map(|r| r.inserted).sum(),
            updated: results.iter().map(|r| r.updated).sum(),
            skipped: results.iter().map(|r| r.skipped).sum(),
            cancelled: stopped
                || results
                    .iter()
                    .any(|r| r.outcome == ScopeOutcome::Cancelled),
            failures,
        };

        if let Err(e) = RunRepository::new(&self.db).record(&summary).await {
            tracing::warn!("Failed to record run summary: {}", e);
        }

        tracing::info!(
            scopes_planned = summary.scopes_planned,
            scopes_succeeded = summary.scopes_succeeded,
            scopes_failed = summary.scopes_failed,
            fetched = summary.fetched,
            inserted = summary.inserted,
            updated = summary.updated,
            skipped = summary.skipped,
            cancelled = summary.cancelled,
            "Run finished in {:.1}s",
            summary.elapsed.as_secs_f64()
        );

        summary
    }
}
