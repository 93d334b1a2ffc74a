use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PipelineLock::Table)
                    .if_not_exists()
                    .col(string_len(PipelineLock::Name, 128).primary_key())
                    .col(string_len(PipelineLock::Token, 64))
                    .col(timestamp(PipelineLock::AcquiredAt))
                    .col(timestamp(PipelineLock::ExpiresAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PipelineLock::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum PipelineLock {
    Table,
    Name,
    Token,
    AcquiredAt,
    ExpiresAt,
}
