use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScopeWatermark::Table)
                    .if_not_exists()
                    .col(string_len(ScopeWatermark::ScopeKey, 64).primary_key())
                    .col(timestamp(ScopeWatermark::Watermark))
                    .col(timestamp(ScopeWatermark::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScopeWatermark::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum ScopeWatermark {
    Table,
    ScopeKey,
    Watermark,
    UpdatedAt,
}
