use sea_orm_migration::{prelude::*, schema::*};

static IDX_KILLMAIL_OCCURRED_AT: &str = "idx-killmail-occurred_at";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Killmail::Table)
                    .if_not_exists()
                    .col(pk_auto(Killmail::Id))
                    .col(big_integer_uniq(Killmail::KillmailId))
                    .col(string_len(Killmail::ContentHash, 64))
                    .col(timestamp(Killmail::OccurredAt))
                    .col(big_integer(Killmail::SolarSystemId))
                    .col(big_integer_null(Killmail::VictimCharacterId))
                    .col(big_integer_null(Killmail::VictimCorporationId))
                    .col(big_integer_null(Killmail::VictimAllianceId))
                    .col(big_integer(Killmail::VictimShipTypeId))
                    .col(double(Killmail::TotalValue))
                    .col(integer(Killmail::AttackerCount))
                    .col(boolean(Killmail::IsNpc))
                    .col(boolean(Killmail::IsSolo))
                    .col(timestamp(Killmail::CreatedAt))
                    .col(timestamp(Killmail::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_KILLMAIL_OCCURRED_AT)
                    .table(Killmail::Table)
                    .col(Killmail::OccurredAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_KILLMAIL_OCCURRED_AT)
                    .table(Killmail::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Killmail::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Killmail {
    Table,
    Id,
    KillmailId,
    ContentHash,
    OccurredAt,
    SolarSystemId,
    VictimCharacterId,
    VictimCorporationId,
    VictimAllianceId,
    VictimShipTypeId,
    TotalValue,
    AttackerCount,
    IsNpc,
    IsSolo,
    CreatedAt,
    UpdatedAt,
}
