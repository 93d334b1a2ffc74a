use sea_orm_migration::{prelude::*, schema::*};

static IDX_PIPELINE_RUN_STARTED_AT: &str = "idx-pipeline_run-started_at";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PipelineRun::Table)
                    .if_not_exists()
                    .col(pk_auto(PipelineRun::Id))
                    .col(timestamp(PipelineRun::StartedAt))
                    .col(timestamp(PipelineRun::FinishedAt))
                    .col(big_integer(PipelineRun::ElapsedMs))
                    .col(integer(PipelineRun::ScopesPlanned))
                    .col(integer(PipelineRun::ScopesSucceeded))
                    .col(integer(PipelineRun::ScopesFailed))
                    .col(big_integer(PipelineRun::RecordsFetched))
                    .col(big_integer(PipelineRun::RecordsInserted))
                    .col(big_integer(PipelineRun::RecordsUpdated))
                    .col(big_integer(PipelineRun::RecordsSkipped))
                    .col(boolean(PipelineRun::Cancelled))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_PIPELINE_RUN_STARTED_AT)
                    .table(PipelineRun::Table)
                    .col(PipelineRun::StartedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_PIPELINE_RUN_STARTED_AT)
                    .table(PipelineRun::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(PipelineRun::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum PipelineRun {
    Table,
    Id,
    StartedAt,
    FinishedAt,
    ElapsedMs,
    ScopesPlanned,
    ScopesSucceeded,
    ScopesFailed,
    RecordsFetched,
    RecordsInserted,
    RecordsUpdated,
    RecordsSkipped,
    Cancelled,
}
