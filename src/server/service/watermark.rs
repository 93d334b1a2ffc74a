//! Per-scope fetch windows derived from stored watermarks.

use chrono::{DateTime, Duration, Utc};

use crate::server::model::pipeline::{FetchPlan, RunOptions};

/// How far back a scope's fetch starts.
#[derive(Debug, Clone)]
pub struct WatermarkPolicy {
    /// Re-read this much before a stored watermark to catch late-reported kills.
    pub overlap: Duration,
    /// Lookback for a scope that has never been ingested.
    pub default_lookback: Duration,
}

impl WatermarkPolicy {
    pub fn new(overlap: Duration, default_lookback: Duration) -> Self {
        Self {
            overlap,
            default_lookback,
        }
    }

    /// Compute the `since` bound for one scope.
    ///
    /// # Arguments
    /// - `plan` - The scope being fetched, for its campaigns' earliest start
    /// - `stored` - The scope's current watermark, if any
    /// - `options` - Run options; an explicit lookback replaces the watermark
    /// - `now` - Run start
    ///
    /// # Returns
    /// - `now - days` when the run was given an explicit lookback
    /// - `watermark - overlap` when the scope has been ingested before
    /// - otherwise the later of the earliest campaign start and `now - default_lookback`
    pub fn since_for(
        &self,
        plan: &FetchPlan,
        stored: Option<DateTime<Utc>>,
        options: &RunOptions,
        now: DateTime<Utc>,
    ) -> DateTime<Utc> {
        if let Some(days) = options.lookback_days {
            // Lookbacks past the representable range start from the earliest instant
            return Duration::try_days(i64::from(days))
                .and_then(|lookback| now.checked_sub_signed(lookback))
                .unwrap_or(DateTime::<Utc>::MIN_UTC);
        }

        match stored {
            Some(watermark) => watermark - self.overlap,
            None => plan.earliest_start.max(now - self.default_lookback),
        }
    }
}

/// The watermark a scope should hold after a successful fetch.
///
/// A scope that returned nothing keeps what it had, including having nothing.
pub fn advance(
    stored: Option<DateTime<Utc>>,
    latest_seen: Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    match (stored, latest_seen) {
        (Some(old), Some(seen)) => Some(old.max(seen)),
        (old, seen) => old.or(seen),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use entity::sea_orm_active_enums::LocationKind;

    use super::*;
    use crate::server::model::pipeline::Scope;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
    }

    fn plan(earliest_start: DateTime<Utc>) -> FetchPlan {
        FetchPlan {
            scope: Scope::Location(LocationKind::System, 30000142),
            campaign_ids: vec![1],
            earliest_start,
        }
    }

    fn policy() -> WatermarkPolicy {
        WatermarkPolicy::new(Duration::hours(1), Duration::days(7))
    }

    /// Expect a stored watermark to be re-read with the overlap
    #[test]
    fn test_since_uses_watermark_minus_overlap() {
        let watermark = now() - Duration::hours(3);

        let since = policy().since_for(
            &plan(now() - Duration::days(30)),
            Some(watermark),
            &RunOptions::default(),
            now(),
        );

        assert_eq!(since, watermark - Duration::hours(1));
    }

    /// Expect a fresh scope to start at its campaign start when that is recent
    #[test]
    fn test_since_fresh_scope_recent_campaign() {
        let start = now() - Duration::days(2);

        let since = policy().since_for(&plan(start), None, &RunOptions::default(), now());

        assert_eq!(since, start);
    }

    /// Expect a fresh scope for an old campaign to be capped by the default lookback
    #[test]
    fn test_since_fresh_scope_capped_by_lookback() {
        let since = policy().since_for(
            &plan(now() - Duration::days(90)),
            None,
            &RunOptions::default(),
            now(),
        );

        assert_eq!(since, now() - Duration::days(7));
    }

    /// Expect a lookback past the representable range to clamp instead of panicking
    #[test]
    fn test_since_huge_lookback_clamps() {
        let options = RunOptions {
            lookback_days: Some(u32::MAX),
            force: false,
        };

        let since = policy().since_for(&plan(now()), None, &options, now());

        assert_eq!(since, DateTime::<Utc>::MIN_UTC);
    }

    /// Expect an explicit lookback to override any stored watermark
    #[test]
    fn test_since_explicit_days_overrides() {
        let options = RunOptions {
            lookback_days: Some(30),
            force: false,
        };

        let since = policy().since_for(&plan(now()), Some(now()), &options, now());

        assert_eq!(since, now() - Duration::days(30));
    }

    /// Expect the watermark to never move backwards and to stay empty without data
    #[test]
    fn test_advance() {
        let old = now() - Duration::hours(2);
        let newer = now() - Duration::hours(1);
        let older = now() - Duration::hours(5);

        assert_eq!(advance(Some(old), Some(newer)), Some(newer));
        assert_eq!(advance(Some(old), Some(older)), Some(old));
        assert_eq!(advance(Some(old), None), Some(old));
        assert_eq!(advance(None, Some(newer)), Some(newer));
        assert_eq!(advance(None, None), None);
    }
}
