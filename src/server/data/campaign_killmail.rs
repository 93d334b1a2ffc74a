use migration::OnConflict;
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
};

use crate::server::model::campaign::CampaignLink;

pub struct CampaignKillmailRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CampaignKillmailRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Link killmails to campaigns, refreshing `is_loss` on links that already exist.
    pub async fn link(&self, links: &[CampaignLink]) -> Result<(), DbErr> {
        if links.is_empty() {
            return Ok(());
        }

        let models = links
            .iter()
            .map(|link| entity::campaign_killmail::ActiveModel {
                campaign_id: ActiveValue::Set(link.campaign_id),
                killmail_id: ActiveValue::Set(link.killmail_id),
                is_loss: ActiveValue::Set(link.is_loss),
            });

        entity::prelude::CampaignKillmail::insert_many(models)
            .on_conflict(
                OnConflict::columns([
                    entity::campaign_killmail::Column::CampaignId,
                    entity::campaign_killmail::Column::KillmailId,
                ])
                .update_column(entity::campaign_killmail::Column::IsLoss)
                .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        Ok(())
    }

    pub async fn find_by_campaign(
        &self,
        campaign_id: i32,
    ) -> Result<Vec<entity::campaign_killmail::Model>, DbErr> {
        entity::prelude::CampaignKillmail::find()
            .filter(entity::campaign_killmail::Column::CampaignId.eq(campaign_id))
            .order_by_asc(entity::campaign_killmail::Column::KillmailId)
            .all(self.db)
            .await
    }
}
