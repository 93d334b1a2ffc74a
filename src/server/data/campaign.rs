use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    sea_query::Expr, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::server::{
    model::campaign::{CampaignConfig, LocationFilter, TrackedEntity},
    util::time::{from_db, to_db},
};

/// Campaigns keep pulling for this long after their end date so late-reported kills land.
pub const END_DATE_GRACE: Duration = Duration::hours(12);

pub struct CampaignRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CampaignRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Load every campaign that should be ingested for at `now`, with scope definitions.
    ///
    /// A campaign is active when its flag is set, it has started, and it has either no end date
    /// or ended less than [`END_DATE_GRACE`] ago.
    pub async fn find_active(&self, now: DateTime<Utc>) -> Result<Vec<CampaignConfig>, DbErr> {
        let campaigns = entity::prelude::Campaign::find()
            .filter(entity::campaign::Column::IsActive.eq(true))
            .filter(entity::campaign::Column::StartDate.lte(to_db(now)))
            .filter(
                Condition::any()
                    .add(entity::campaign::Column::EndDate.is_null())
                    .add(entity::campaign::Column::EndDate.gt(to_db(now - END_DATE_GRACE))),
            )
            .order_by_asc(entity::campaign::Column::Id)
            .all(self.db)
            .await?;

        if campaigns.is_empty() {
            return Ok(Vec::new());
        }

        let campaign_ids: Vec<i32> = campaigns.iter().map(|c| c.id).collect();

        let mut locations: HashMap<i32, Vec<LocationFilter>> = HashMap::new();
        for row in entity::prelude::CampaignLocation::find()
            .filter(entity::campaign_location::Column::CampaignId.is_in(campaign_ids.clone()))
            .order_by_asc(entity::campaign_location::Column::Id)
            .all(self.db)
            .await?
        {
            locations
                .entry(row.campaign_id)
                .or_default()
                .push(LocationFilter {
                    kind: row.location_kind,
                    id: row.location_id,
                });
        }

        let mut entities: HashMap<i32, Vec<TrackedEntity>> = HashMap::new();
        for row in entity::prelude::CampaignEntity::find()
            .filter(entity::campaign_entity::Column::CampaignId.is_in(campaign_ids))
            .order_by_asc(entity::campaign_entity::Column::Id)
            .all(self.db)
            .await?
        {
            entities
                .entry(row.campaign_id)
                .or_default()
                .push(TrackedEntity {
                    kind: row.entity_kind,
                    id: row.entity_id,
                    side: row.side,
                    corporation_id: row.corporation_id,
                    alliance_id: row.alliance_id,
                });
        }

        Ok(campaigns
            .into_iter()
            .map(|campaign| CampaignConfig {
                locations: locations.remove(&campaign.id).unwrap_or_default(),
                entities: entities.remove(&campaign.id).unwrap_or_default(),
                id: campaign.id,
                name: campaign.name,
                start_date: from_db(campaign.start_date),
                end_date: campaign.end_date.map(from_db),
            })
            .collect())
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<entity::campaign::Model>, DbErr> {
        entity::prelude::Campaign::find_by_id(id).one(self.db).await
    }

    /// Stamp `last_run` on the given campaigns.
    ///
    /// # Returns
    /// Number of campaign rows updated.
    pub async fn update_last_run(
        &self,
        campaign_ids: &[i32],
        last_run: DateTime<Utc>,
    ) -> Result<u64, DbErr> {
        if campaign_ids.is_empty() {
            return Ok(0);
        }

        let result = entity::prelude::Campaign::update_many()
            .col_expr(entity::campaign::Column::LastRun, Expr::value(to_db(last_run)))
            .col_expr(
                entity::campaign::Column::UpdatedAt,
                Expr::value(to_db(Utc::now())),
            )
            .filter(entity::campaign::Column::Id.is_in(campaign_ids.to_vec()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
