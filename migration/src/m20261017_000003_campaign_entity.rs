use sea_orm_migration::{prelude::*, schema::*};

use crate::m20261017_000001_campaign::Campaign;

static IDX_CAMPAIGN_ENTITY_UNIQUE: &str = "idx-campaign_entity-campaign_id-kind-entity_id-side";
static FK_CAMPAIGN_ENTITY_CAMPAIGN_ID: &str = "fk-campaign_entity-campaign_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CampaignEntity::Table)
                    .if_not_exists()
                    .col(pk_auto(CampaignEntity::Id))
                    .col(integer(CampaignEntity::CampaignId))
                    .col(string_len(CampaignEntity::EntityKind, 16))
                    .col(big_integer(CampaignEntity::EntityId))
                    .col(string_len(CampaignEntity::Side, 16))
                    .col(big_integer_null(CampaignEntity::CorporationId))
                    .col(big_integer_null(CampaignEntity::AllianceId))
                    .foreign_key(
                        &mut ForeignKey::create()
                            .name(FK_CAMPAIGN_ENTITY_CAMPAIGN_ID)
                            .from(CampaignEntity::Table, CampaignEntity::CampaignId)
                            .to(Campaign::Table, Campaign::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_CAMPAIGN_ENTITY_UNIQUE)
                    .table(CampaignEntity::Table)
                    .col(CampaignEntity::CampaignId)
                    .col(CampaignEntity::EntityKind)
                    .col(CampaignEntity::EntityId)
                    .col(CampaignEntity::Side)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_CAMPAIGN_ENTITY_UNIQUE)
                    .table(CampaignEntity::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(CampaignEntity::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum CampaignEntity {
    Table,
    Id,
    CampaignId,
    EntityKind,
    EntityId,
    Side,
    CorporationId,
    AllianceId,
}
