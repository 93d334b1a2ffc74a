use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20261017_000001_campaign::Campaign, m20261017_000004_killmail::Killmail};

static IDX_CAMPAIGN_KILLMAIL_KILLMAIL_ID: &str = "idx-campaign_killmail-killmail_id";
static FK_CAMPAIGN_KILLMAIL_CAMPAIGN_ID: &str = "fk-campaign_killmail-campaign_id";
static FK_CAMPAIGN_KILLMAIL_KILLMAIL_ID: &str = "fk-campaign_killmail-killmail_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CampaignKillmail::Table)
                    .if_not_exists()
                    .col(integer(CampaignKillmail::CampaignId))
                    .col(big_integer(CampaignKillmail::KillmailId))
                    .col(boolean(CampaignKillmail::IsLoss))
                    .primary_key(
                        &mut Index::create()
                            .col(CampaignKillmail::CampaignId)
                            .col(CampaignKillmail::KillmailId),
                    )
                    .foreign_key(
                        &mut ForeignKey::create()
                            .name(FK_CAMPAIGN_KILLMAIL_CAMPAIGN_ID)
                            .from(CampaignKillmail::Table, CampaignKillmail::CampaignId)
                            .to(Campaign::Table, Campaign::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        &mut ForeignKey::create()
                            .name(FK_CAMPAIGN_KILLMAIL_KILLMAIL_ID)
                            .from(CampaignKillmail::Table, CampaignKillmail::KillmailId)
                            .to(Killmail::Table, Killmail::KillmailId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_CAMPAIGN_KILLMAIL_KILLMAIL_ID)
                    .table(CampaignKillmail::Table)
                    .col(CampaignKillmail::KillmailId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_CAMPAIGN_KILLMAIL_KILLMAIL_ID)
                    .table(CampaignKillmail::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(CampaignKillmail::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum CampaignKillmail {
    Table,
    CampaignId,
    KillmailId,
    IsLoss,
}
