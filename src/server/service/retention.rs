//! Killmail retention.

use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;

use crate::server::{data::killmail::KillmailRepository, error::Error};

pub struct RetentionService {
    db: DatabaseConnection,
    retention: Duration,
}

impl RetentionService {
    pub fn new(db: DatabaseConnection, retention_days: i64) -> Self {
        Self {
            db,
            retention: Duration::days(retention_days),
        }
    }

    /// Delete killmails, and their participants, that occurred before the retention window.
    ///
    /// # Returns
    /// Number of killmails deleted.
    pub async fn purge(&self) -> Result<u64, Error> {
        let cutoff = Utc::now() - self.retention;
        let deleted = KillmailRepository::new(&self.db)
            .delete_older_than(cutoff)
            .await?;

        if deleted > 0 {
            tracing::info!("Purged {} killmail(s) older than {}", deleted, cutoff);
        } else {
            tracing::debug!("No killmails older than {} to purge", cutoff);
        }

        Ok(deleted)
    }
}
