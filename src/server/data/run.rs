use sea_orm::{ActiveValue, ConnectionTrait, DbErr, EntityTrait, QueryOrder};

use crate::server::{model::pipeline::RunSummary, util::time::to_db};

pub struct RunRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> RunRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Persist the summary of a finished run.
    pub async fn record(&self, summary: &RunSummary) -> Result<entity::pipeline_run::Model, DbErr> {
        entity::prelude::PipelineRun::insert(entity::pipeline_run::ActiveModel {
            started_at: ActiveValue::Set(to_db(summary.started_at)),
            finished_at: ActiveValue::Set(to_db(summary.finished_at)),
            elapsed_ms: ActiveValue::Set(summary.elapsed.as_millis() as i64),
            scopes_planned: ActiveValue::Set(summary.scopes_planned as i32),
            scopes_succeeded: ActiveValue::Set(summary.scopes_succeeded as i32),
            scopes_failed: ActiveValue::Set(summary.scopes_failed as i32),
            records_fetched: ActiveValue::Set(summary.fetched as i64),
            records_inserted: ActiveValue::Set(summary.inserted as i64),
            records_updated: ActiveValue::Set(summary.updated as i64),
            records_skipped: ActiveValue::Set(summary.skipped as i64),
            cancelled: ActiveValue::Set(summary.cancelled),
            ..Default::default()
        })
        .exec_with_returning(self.db)
        .await
    }

    pub async fn latest(&self) -> Result<Option<entity::pipeline_run::Model>, DbErr> {
        entity::prelude::PipelineRun::find()
            .order_by_desc(entity::pipeline_run::Column::Id)
            .one(self.db)
            .await
    }
}
