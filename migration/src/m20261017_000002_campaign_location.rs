use sea_orm_migration::{prelude::*, schema::*};

use crate::m20261017_000001_campaign::Campaign;

static IDX_CAMPAIGN_LOCATION_UNIQUE: &str = "idx-campaign_location-campaign_id-kind-location_id";
static FK_CAMPAIGN_LOCATION_CAMPAIGN_ID: &str = "fk-campaign_location-campaign_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CampaignLocation::Table)
                    .if_not_exists()
                    .col(pk_auto(CampaignLocation::Id))
                    .col(integer(CampaignLocation::CampaignId))
                    .col(string_len(CampaignLocation::LocationKind, 16))
                    .col(big_integer(CampaignLocation::LocationId))
                    .foreign_key(
                        &mut ForeignKey::create()
                            .name(FK_CAMPAIGN_LOCATION_CAMPAIGN_ID)
                            .from(CampaignLocation::Table, CampaignLocation::CampaignId)
                            .to(Campaign::Table, Campaign::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_CAMPAIGN_LOCATION_UNIQUE)
                    .table(CampaignLocation::Table)
                    .col(CampaignLocation::CampaignId)
                    .col(CampaignLocation::LocationKind)
                    .col(CampaignLocation::LocationId)
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
                    .name(IDX_CAMPAIGN_LOCATION_UNIQUE)
                    .table(CampaignLocation::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(CampaignLocation::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum CampaignLocation {
    Table,
    Id,
    CampaignId,
    LocationKind,
    LocationId,
}
