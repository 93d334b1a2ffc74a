use chrono::{DateTime, Utc};
use migration::OnConflict;
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::server::{model::killmail::RawRecord, util::time::to_db};

/// Rows deleted per statement when purging old killmails.
const PURGE_BATCH_SIZE: u64 = 500;

pub struct KillmailRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> KillmailRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_upstream_id(
        &self,
        killmail_id: i64,
    ) -> Result<Option<entity::killmail::Model>, DbErr> {
        entity::prelude::Killmail::find()
            .filter(entity::killmail::Column::KillmailId.eq(killmail_id))
            .one(self.db)
            .await
    }

    /// Insert a killmail unless one with the same upstream ID already exists.
    ///
    /// # Returns
    /// - `Ok(true)` - Row inserted
    /// - `Ok(false)` - A row with this upstream ID already existed and was left untouched
    pub async fn insert_if_absent(&self, record: &RawRecord) -> Result<bool, DbErr> {
        let rows = entity::prelude::Killmail::insert(Self::active_model(record))
            .on_conflict(
                OnConflict::column(entity::killmail::Column::KillmailId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        Ok(rows > 0)
    }

    /// Insert or overwrite a killmail keyed by its upstream ID.
    pub async fn upsert_killmail(&self, record: &RawRecord) -> Result<(), DbErr> {
        entity::prelude::Killmail::insert(Self::active_model(record))
            .on_conflict(
                OnConflict::column(entity::killmail::Column::KillmailId)
                    .update_columns([
                        entity::killmail::Column::ContentHash,
                        entity::killmail::Column::OccurredAt,
                        entity::killmail::Column::SolarSystemId,
                        entity::killmail::Column::VictimCharacterId,
                        entity::killmail::Column::VictimCorporationId,
                        entity::killmail::Column::VictimAllianceId,
                        entity::killmail::Column::VictimShipTypeId,
                        entity::killmail::Column::TotalValue,
                        entity::killmail::Column::AttackerCount,
                        entity::killmail::Column::IsNpc,
                        entity::killmail::Column::IsSolo,
                        entity::killmail::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        Ok(())
    }

    /// Delete killmails that occurred before `cutoff`, along with their participants and
    /// campaign links.
    ///
    /// Works in batches of [`PURGE_BATCH_SIZE`] to keep individual statements small.
    ///
    /// # Returns
    /// Number of killmails deleted.
    pub async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, DbErr> {
        let mut deleted = 0;

        loop {
            let ids: Vec<i64> = entity::prelude::Killmail::find()
                .select_only()
                .column(entity::killmail::Column::KillmailId)
                .filter(entity::killmail::Column::OccurredAt.lt(to_db(cutoff)))
                .order_by_asc(entity::killmail::Column::OccurredAt)
                .limit(PURGE_BATCH_SIZE)
                .into_tuple()
                .all(self.db)
                .await?;

            if ids.is_empty() {
                break;
            }

            entity::prelude::KillmailParticipant::delete_many()
                .filter(entity::killmail_participant::Column::KillmailId.is_in(ids.clone()))
                .exec(self.db)
                .await?;

            entity::prelude::CampaignKillmail::delete_many()
                .filter(entity::campaign_killmail::Column::KillmailId.is_in(ids.clone()))
                .exec(self.db)
                .await?;

            let result = entity::prelude::Killmail::delete_many()
                .filter(entity::killmail::Column::KillmailId.is_in(ids))
                .exec(self.db)
                .await?;

            deleted += result.rows_affected;
        }

        Ok(deleted)
    }

    fn active_model(record: &RawRecord) -> entity::killmail::ActiveModel {
        let now = to_db(Utc::now());

        entity::killmail::ActiveModel {
            killmail_id: ActiveValue::Set(record.killmail_id),
            content_hash: ActiveValue::Set(record.content_hash.clone()),
            occurred_at: ActiveValue::Set(to_db(record.occurred_at)),
            solar_system_id: ActiveValue::Set(record.solar_system_id),
            victim_character_id: ActiveValue::Set(record.victim.character_id),
            victim_corporation_id: ActiveValue::Set(record.victim.corporation_id),
            victim_alliance_id: ActiveValue::Set(record.victim.alliance_id),
            victim_ship_type_id: ActiveValue::Set(record.victim.ship_type_id),
            total_value: ActiveValue::Set(record.total_value),
            attacker_count: ActiveValue::Set(record.attackers.len() as i32),
            is_npc: ActiveValue::Set(record.is_npc),
            is_solo: ActiveValue::Set(record.is_solo),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
    }
}
