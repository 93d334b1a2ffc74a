use chrono::{DateTime, Utc};
use migration::OnConflict;
use sea_orm::{ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};

use crate::server::util::time::to_db;

pub struct LockRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> LockRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find(&self, name: &str) -> Result<Option<entity::pipeline_lock::Model>, DbErr> {
        entity::prelude::PipelineLock::find_by_id(name.to_string())
            .one(self.db)
            .await
    }

    /// Delete the named lock if it expired at or before `now`.
    pub async fn delete_expired(&self, name: &str, now: DateTime<Utc>) -> Result<u64, DbErr> {
        let result = entity::prelude::PipelineLock::delete_many()
            .filter(entity::pipeline_lock::Column::Name.eq(name))
            .filter(entity::pipeline_lock::Column::ExpiresAt.lte(to_db(now)))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Insert the lock row unless one already exists for `name`.
    ///
    /// # Returns
    /// - `Ok(true)` - This caller now holds the lock
    /// - `Ok(false)` - Another holder's row is present
    pub async fn try_insert(
        &self,
        name: &str,
        token: &str,
        acquired_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, DbErr> {
        let rows = entity::prelude::PipelineLock::insert(entity::pipeline_lock::ActiveModel {
            name: ActiveValue::Set(name.to_string()),
            token: ActiveValue::Set(token.to_string()),
            acquired_at: ActiveValue::Set(to_db(acquired_at)),
            expires_at: ActiveValue::Set(to_db(expires_at)),
        })
        .on_conflict(
            OnConflict::column(entity::pipeline_lock::Column::Name)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(self.db)
        .await?;

        Ok(rows > 0)
    }

    /// Delete the named lock only if it is still held by `token`.
    pub async fn delete_with_token(&self, name: &str, token: &str) -> Result<bool, DbErr> {
        let result = entity::prelude::PipelineLock::delete_many()
            .filter(entity::pipeline_lock::Column::Name.eq(name))
            .filter(entity::pipeline_lock::Column::Token.eq(token))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Delete the named lock regardless of holder.
    pub async fn delete(&self, name: &str) -> Result<bool, DbErr> {
        let result = entity::prelude::PipelineLock::delete_by_id(name.to_string())
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
