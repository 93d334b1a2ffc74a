use chrono::{DateTime, Utc};
use migration::OnConflict;
use sea_orm::{ActiveValue, ConnectionTrait, DbErr, EntityTrait};

use crate::server::util::time::{from_db, to_db};

pub struct WatermarkRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> WatermarkRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn read_watermark(&self, scope_key: &str) -> Result<Option<DateTime<Utc>>, DbErr> {
        Ok(entity::prelude::ScopeWatermark::find_by_id(scope_key.to_string())
            .one(self.db)
            .await?
            .map(|row| from_db(row.watermark)))
    }

    /// Record that `scope_key` is fully ingested through `instant`.
    ///
    /// Never moves a watermark backwards: an `instant` older than the stored value is ignored.
    ///
    /// # Returns
    /// The watermark stored after the call.
    pub async fn write_watermark(
        &self,
        scope_key: &str,
        instant: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, DbErr> {
        if let Some(existing) = self.read_watermark(scope_key).await? {
            if existing >= instant {
                return Ok(existing);
            }
        }

        entity::prelude::ScopeWatermark::insert(entity::scope_watermark::ActiveModel {
            scope_key: ActiveValue::Set(scope_key.to_string()),
            watermark: ActiveValue::Set(to_db(instant)),
            updated_at: ActiveValue::Set(to_db(Utc::now())),
        })
        .on_conflict(
            OnConflict::column(entity::scope_watermark::Column::ScopeKey)
                .update_columns([
                    entity::scope_watermark::Column::Watermark,
                    entity::scope_watermark::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(self.db)
        .await?;

        Ok(instant)
    }
}
