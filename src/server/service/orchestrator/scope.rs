use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::state::PipelineState;
use crate::server::{
    error::Error,
    model::{
        campaign::{CampaignConfig, CampaignLink},
        killmail::{FetchedEntry, Involvement, RawRecord, UpsertOutcome},
        pipeline::Scope,
    },
    service::{
        fetch::{esi::EsiClient, zkill::ZkillClient},
        upsert::Upserter,
    },
    util::stop::StopSignal,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeOutcome {
    /// Paged back to `since` and persisted everything fetched.
    Completed,
    Failed(String),
    /// Stopped at a page boundary; pages persisted before the stop remain.
    Cancelled,
    /// Gave up at the page cap before reaching `since`; pages persisted before the cap remain.
    Truncated,
}

/// One scope to fetch, owned so the job can move into a spawned future.
#[derive(Debug, Clone)]
pub(super) struct ScopeJob {
    pub scope: Scope,
    pub since: DateTime<Utc>,
    /// Campaigns fed by the scope, for linking what it fetches.
    pub campaign_ids: Vec<i32>,
}

/// What one scope's fetch produced.
#[derive(Debug, Clone)]
pub struct ScopeResult {
    pub scope: Scope,
    pub outcome: ScopeOutcome,
    pub fetched: u64,
    pub inserted: u64,
    pub updated: u64,
    pub skipped: u64,
    /// Latest `occurred_at` among records in the window, persisted now or already stored.
    pub latest_seen: Option<DateTime<Utc>>,
}

impl ScopeResult {
    fn new(scope: Scope) -> Self {
        Self {
            scope,
            outcome: ScopeOutcome::Completed,
            fetched: 0,
            inserted: 0,
            updated: 0,
            skipped: 0,
            latest_seen: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.outcome == ScopeOutcome::Completed
    }
}

/// A summary entry whose exact content is already stored.
struct StoredEntry {
    killmail_id: i64,
    occurred_at: DateTime<Utc>,
}

/// Pages one scope through fetch, hydration and persistence.
pub(super) struct ScopeRunner<'a> {
    pub zkill: &'a ZkillClient,
    pub esi: &'a EsiClient,
    pub upserter: &'a Upserter,
    /// Active campaigns by ID.
    pub campaigns: &'a HashMap<i32, CampaignConfig>,
    pub stop: StopSignal,
}

impl ScopeRunner<'_> {
    /// Run a scope to completion, failure or cancellation.
    ///
    /// Failures are captured in the result rather than returned so one scope never fails the run.
    pub async fn run(&self, job: ScopeJob, now: DateTime<Utc>) -> ScopeResult {
        let scope = job.scope;
        let mut result = ScopeResult::new(scope);

        tracing::debug!(scope = %scope, "Fetching killmails since {}", job.since);

        result.outcome = match self.drive(&job, now, &mut result).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(scope = %scope, "Scope failed: {}", e);
                ScopeOutcome::Failed(e.to_string())
            }
        };

        tracing::debug!(
            scope = %scope,
            fetched = result.fetched,
            inserted = result.inserted,
            updated = result.updated,
            skipped = result.skipped,
            "Scope finished: {:?}",
            result.outcome
        );

        result
    }

    async fn drive(
        &self,
        job: &ScopeJob,
        now: DateTime<Utc>,
        result: &mut ScopeResult,
    ) -> Result<ScopeOutcome, Error> {
        let scope = job.scope;
        let since = job.since;
        let mut state = PipelineState::Fetching;
        let mut cursor = self.zkill.pages(scope, since, now);

        loop {
            if self.stop.is_stopped() {
                return Ok(ScopeOutcome::Cancelled);
            }

            let Some(page) = cursor.next_page().await? else {
                if cursor.is_truncated() {
                    return Ok(ScopeOutcome::Truncated);
                }
                return Ok(ScopeOutcome::Completed);
            };

            if self.stop.is_stopped() {
                tracing::debug!(scope = %scope, "Discarding page fetched after stop request");
                return Ok(ScopeOutcome::Cancelled);
            }

            let mut records = Vec::with_capacity(page.len());
            let mut stored = Vec::new();
            for entry in page {
                match entry {
                    FetchedEntry::Full(record) => records.push(record),
                    FetchedEntry::Summary(reference) => {
                        match self
                            .upserter
                            .stored_at(reference.killmail_id, &reference.zkb.hash)
                            .await?
                        {
                            Some(occurred_at) => stored.push(StoredEntry {
                                killmail_id: reference.killmail_id,
                                occurred_at,
                            }),
                            None => records.push(self.esi.killmail(&reference).await?),
                        }
                    }
                }
            }

            // Summaries only reveal their time once resolved; pages run newest first
            let oldest = records
                .iter()
                .map(|record| record.occurred_at)
                .chain(stored.iter().map(|entry| entry.occurred_at))
                .min();
            if oldest.is_some_and(|at| at < since) {
                cursor.finish();
            }

            records.retain(|record| record.occurred_at >= since);
            stored.retain(|entry| entry.occurred_at >= since);
            result.fetched += (records.len() + stored.len()) as u64;
            result.skipped += stored.len() as u64;

            state.transition(PipelineState::Persisting)?;

            let outcomes = self.upserter.process_batch(&records).await?;
            for outcome in outcomes {
                match outcome {
                    UpsertOutcome::Inserted => result.inserted += 1,
                    UpsertOutcome::Updated => result.updated += 1,
                    UpsertOutcome::SkippedDuplicate => result.skipped += 1,
                }
            }

            let links = self.links(job, &records, &stored).await?;
            self.upserter.link(&links).await?;

            let page_latest = records
                .iter()
                .map(|record| record.occurred_at)
                .chain(stored.iter().map(|entry| entry.occurred_at))
                .max();
            result.latest_seen = result.latest_seen.max(page_latest);

            state.transition(PipelineState::Fetching)?;
        }
    }

    /// Attribute a page's killmails to the campaigns the scope feeds.
    async fn links(
        &self,
        job: &ScopeJob,
        records: &[RawRecord],
        stored: &[StoredEntry],
    ) -> Result<Vec<CampaignLink>, Error> {
        let campaigns: Vec<&CampaignConfig> = job
            .campaign_ids
            .iter()
            .filter_map(|id| self.campaigns.get(id))
            .collect();
        if campaigns.is_empty() {
            return Ok(Vec::new());
        }

        let mut killmails: Vec<(i64, DateTime<Utc>, Involvement)> = records
            .iter()
            .map(|record| (record.killmail_id, record.occurred_at, record.involvement()))
            .collect();
        for entry in stored {
            if let Some(involvement) = self.upserter.stored_involvement(entry.killmail_id).await? {
                killmails.push((entry.killmail_id, entry.occurred_at, involvement));
            }
        }

        let via_location = matches!(job.scope, Scope::Location(..));

        let links = killmails
            .iter()
            .flat_map(|(killmail_id, occurred_at, involvement)| {
                campaigns.iter().filter_map(move |campaign| {
                    campaign
                        .attribute(involvement, *occurred_at, via_location)
                        .map(|is_loss| CampaignLink {
                            campaign_id: campaign.id,
                            killmail_id: *killmail_id,
                            is_loss,
                        })
                })
            })
            .collect();

        Ok(links)
    }
}
