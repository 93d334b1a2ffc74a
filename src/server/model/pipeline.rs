//! Scopes, fetch plans and run summaries.

use std::{fmt, time::Duration};

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::{EntityKind, LocationKind};

/// Unit of upstream query granularity: one location or one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    Location(LocationKind, i64),
    Entity(EntityKind, i64),
}

impl Scope {
    /// zKillboard URL modifier for this scope.
    pub fn modifier(&self) -> &'static str {
        match self {
            Scope::Location(LocationKind::System, _) => "systemID",
            Scope::Location(LocationKind::Constellation, _) => "constellationID",
            Scope::Location(LocationKind::Region, _) => "regionID",
            Scope::Entity(EntityKind::Alliance, _) => "allianceID",
            Scope::Entity(EntityKind::Corporation, _) => "corporationID",
            Scope::Entity(EntityKind::Character, _) => "characterID",
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Scope::Location(_, id) | Scope::Entity(_, id) => *id,
        }
    }

    /// Stable key naming this scope's watermark, e.g. `systemID:30000142`.
    pub fn key(&self) -> String {
        format!("{}:{}", self.modifier(), self.id())
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.modifier(), self.id())
    }
}

/// One upstream fetch the planner decided is needed.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchPlan {
    pub scope: Scope,
    /// Campaigns fed by this scope, sorted and deduplicated.
    pub campaign_ids: Vec<i32>,
    /// Earliest start date among the fed campaigns; bounds the first fetch of a scope.
    pub earliest_start: DateTime<Utc>,
}

/// Options for a single pipeline run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Explicit lookback that replaces watermark-driven windows for every scope.
    pub lookback_days: Option<u32>,
    /// Clear any existing run lock before acquiring.
    pub force: bool,
}

/// Result of invoking the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed(RunSummary),
    /// Another run holds the lock; nothing was done.
    AlreadyRunning,
}

/// Per-run counts emitted regardless of partial failure.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub scopes_planned: usize,
    pub scopes_succeeded: usize,
    pub scopes_failed: usize,
    pub fetched: u64,
    pub inserted: u64,
    pub updated: u64,
    pub skipped: u64,
    pub cancelled: bool,
    /// Scope key and reason for every failed scope.
    pub failures: Vec<(String, String)>,
}

impl RunSummary {
    /// Every planned scope failed; partial failure is not total failure.
    pub fn is_total_failure(&self) -> bool {
        self.scopes_planned > 0 && self.scopes_succeeded == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Scopes: {} planned, {} succeeded, {} failed{}",
            self.scopes_planned,
            self.scopes_succeeded,
            self.scopes_failed,
            if self.cancelled { " (cancelled)" } else { "" }
        )?;
        writeln!(
            f,
            "Killmails: {} fetched, {} inserted, {} updated, {} skipped",
            self.fetched, self.inserted, self.updated, self.skipped
        )?;
        for (scope, reason) in &self.failures {
            writeln!(f, "  failed {}: {}", scope, reason)?;
        }
        write!(f, "Elapsed: {:.1}s", self.elapsed.as_secs_f64())
    }
}
