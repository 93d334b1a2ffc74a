//! Campaign database insertion utilities.

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::{EntityKind, EntitySide, LocationKind};
use sea_orm::{ActiveValue, EntityTrait};

use crate::{error::TestError, TestContext};

impl TestContext {
    pub fn campaigns<'a>(&'a self) -> CampaignFixtures<'a> {
        CampaignFixtures { setup: self }
    }
}

pub struct CampaignFixtures<'a> {
    pub setup: &'a TestContext,
}

impl<'a> CampaignFixtures<'a> {
    /// Insert an active, open-ended campaign.
    pub async fn insert_campaign(
        &self,
        name: &str,
        start_date: DateTime<Utc>,
    ) -> Result<entity::campaign::Model, TestError> {
        self.insert_campaign_with(name, start_date, None, true)
            .await
    }

    /// Insert a campaign with full control over its window and active flag.
    pub async fn insert_campaign_with(
        &self,
        name: &str,
        start_date: DateTime<Utc>,
        end_date: Option<DateTime<Utc>>,
        is_active: bool,
    ) -> Result<entity::campaign::Model, TestError> {
        let now = Utc::now().naive_utc();

        Ok(
            entity::prelude::Campaign::insert(entity::campaign::ActiveModel {
                name: ActiveValue::Set(name.to_string()),
                start_date: ActiveValue::Set(start_date.naive_utc()),
                end_date: ActiveValue::Set(end_date.map(|end| end.naive_utc())),
                is_active: ActiveValue::Set(is_active),
                last_run: ActiveValue::Set(None),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }

    pub async fn insert_location(
        &self,
        campaign_id: i32,
        kind: LocationKind,
        location_id: i64,
    ) -> Result<entity::campaign_location::Model, TestError> {
        Ok(entity::prelude::CampaignLocation::insert(
            entity::campaign_location::ActiveModel {
                campaign_id: ActiveValue::Set(campaign_id),
                location_kind: ActiveValue::Set(kind),
                location_id: ActiveValue::Set(location_id),
                ..Default::default()
            },
        )
        .exec_with_returning(&self.setup.db)
        .await?)
    }

    /// Insert a friendly tracked entity with its known affiliation.
    pub async fn insert_entity(
        &self,
        campaign_id: i32,
        kind: EntityKind,
        entity_id: i64,
        corporation_id: Option<i64>,
        alliance_id: Option<i64>,
    ) -> Result<entity::campaign_entity::Model, TestError> {
        Ok(
            entity::prelude::CampaignEntity::insert(entity::campaign_entity::ActiveModel {
                campaign_id: ActiveValue::Set(campaign_id),
                entity_kind: ActiveValue::Set(kind),
                entity_id: ActiveValue::Set(entity_id),
                side: ActiveValue::Set(EntitySide::Friendly),
                corporation_id: ActiveValue::Set(corporation_id),
                alliance_id: ActiveValue::Set(alliance_id),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }
}
