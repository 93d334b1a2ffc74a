use migration::OnConflict;
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
};

use crate::server::model::killmail::ParticipantRecord;

pub struct ParticipantRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ParticipantRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Upsert participant rows keyed by (killmail, character).
    pub async fn upsert_participants(
        &self,
        killmail_id: i64,
        participants: &[ParticipantRecord],
    ) -> Result<(), DbErr> {
        if participants.is_empty() {
            return Ok(());
        }

        let models = participants
            .iter()
            .map(|p| entity::killmail_participant::ActiveModel {
                killmail_id: ActiveValue::Set(killmail_id),
                character_id: ActiveValue::Set(p.character_id),
                corporation_id: ActiveValue::Set(p.corporation_id),
                alliance_id: ActiveValue::Set(p.alliance_id),
                ship_type_id: ActiveValue::Set(p.ship_type_id),
                role: ActiveValue::Set(p.role),
                damage: ActiveValue::Set(p.damage),
            });

        entity::prelude::KillmailParticipant::insert_many(models)
            .on_conflict(
                OnConflict::columns([
                    entity::killmail_participant::Column::KillmailId,
                    entity::killmail_participant::Column::CharacterId,
                ])
                .update_columns([
                    entity::killmail_participant::Column::CorporationId,
                    entity::killmail_participant::Column::AllianceId,
                    entity::killmail_participant::Column::ShipTypeId,
                    entity::killmail_participant::Column::Role,
                    entity::killmail_participant::Column::Damage,
                ])
                .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        Ok(())
    }

    /// Remove participants of a killmail whose character is not in `keep`.
    ///
    /// Used after an upstream correction so rows for characters dropped from the killmail
    /// do not linger.
    pub async fn delete_except(&self, killmail_id: i64, keep: &[i64]) -> Result<u64, DbErr> {
        let result = entity::prelude::KillmailParticipant::delete_many()
            .filter(entity::killmail_participant::Column::KillmailId.eq(killmail_id))
            .filter(entity::killmail_participant::Column::CharacterId.is_not_in(keep.to_vec()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn find_by_killmail(
        &self,
        killmail_id: i64,
    ) -> Result<Vec<entity::killmail_participant::Model>, DbErr> {
        entity::prelude::KillmailParticipant::find()
            .filter(entity::killmail_participant::Column::KillmailId.eq(killmail_id))
            .order_by_asc(entity::killmail_participant::Column::CharacterId)
            .all(self.db)
            .await
    }
}
