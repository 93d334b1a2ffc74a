use sea_orm_migration::{prelude::*, schema::*};

static IDX_CAMPAIGN_IS_ACTIVE: &str = "idx-campaign-is_active";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Campaign::Table)
                    .if_not_exists()
                    .col(pk_auto(Campaign::Id))
                    .col(string(Campaign::Name))
                    .col(timestamp(Campaign::StartDate))
                    .col(timestamp_null(Campaign::EndDate))
                    .col(boolean(Campaign::IsActive).default(true))
                    .col(timestamp_null(Campaign::LastRun))
                    .col(timestamp(Campaign::CreatedAt))
                    .col(timestamp(Campaign::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_CAMPAIGN_IS_ACTIVE)
                    .table(Campaign::Table)
                    .col(Campaign::IsActive)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_CAMPAIGN_IS_ACTIVE)
                    .table(Campaign::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Campaign::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Campaign {
    Table,
    Id,
    Name,
    StartDate,
    EndDate,
    IsActive,
    LastRun,
    CreatedAt,
    UpdatedAt,
}
