use std::time::Duration;

use chrono::Utc;
use sea_orm::DatabaseConnection;

use super::LockToken;
use crate::server::{data::lock::LockRepository, error::Error};

/// Run lock held as a row in `pipeline_lock`, for deployments without Valkey.
///
/// Mutual exclusion comes from the unique key on the lock name; expiry is checked on acquire.
#[derive(Clone)]
pub struct DatabaseLock {
    db: DatabaseConnection,
}

impl DatabaseLock {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn acquire(&self, name: &str, ttl: Duration) -> Result<Option<LockToken>, Error> {
        let lock_repo = LockRepository::new(&self.db);
        let now = Utc::now();
        let ttl = chrono::Duration::from_std(ttl).map_err(|e| {
            Error::InternalError(format!("lock ttl {:?} out of range: {}", ttl, e))
        })?;

        let reclaimed = lock_repo.delete_expired(name, now).await?;
        if reclaimed > 0 {
            tracing::info!(lock = name, "Reclaimed expired run lock");
        }

        let token = LockToken::generate(name);
        let acquired = lock_repo
            .try_insert(name, &token.token, now, now + ttl)
            .await?;

        Ok(acquired.then_some(token))
    }

    pub async fn release(&self, token: &LockToken) -> Result<bool, Error> {
        Ok(LockRepository::new(&self.db)
            .delete_with_token(&token.name, &token.token)
            .await?)
    }

    pub async fn is_expired(&self, name: &str) -> Result<bool, Error> {
        let lock = LockRepository::new(&self.db).find(name).await?;

        Ok(match lock {
            Some(lock) => lock.expires_at <= Utc::now().naive_utc(),
            None => true,
        })
    }

    pub async fn force_clear(&self, name: &str) -> Result<bool, Error> {
        Ok(LockRepository::new(&self.db).delete(name).await?)
    }
}
