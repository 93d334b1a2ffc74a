pub mod ingest {
    /// Default cron expression for pipeline runs
    /// Runs every hour at the top of the hour; overridden by `PIPELINE_INGEST_CRON`
    pub const DEFAULT_CRON_EXPRESSION: &str = "0 0 * * * *";
}

pub mod retention {
    /// Cron expression for the killmail retention purge
    /// Runs daily at 04:30, away from the top-of-hour ingest runs
    pub const CRON_EXPRESSION: &str = "0 30 4 * * *";
}
