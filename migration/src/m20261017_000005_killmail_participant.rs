use sea_orm_migration::{prelude::*, schema::*};

use crate::m20261017_000004_killmail::Killmail;

static IDX_KILLMAIL_PARTICIPANT_CHARACTER_ID: &str = "idx-killmail_participant-character_id";
static FK_KILLMAIL_PARTICIPANT_KILLMAIL_ID: &str = "fk-killmail_participant-killmail_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(KillmailParticipant::Table)
                    .if_not_exists()
                    .col(big_integer(KillmailParticipant::KillmailId))
                    .col(big_integer(KillmailParticipant::CharacterId))
                    .col(big_integer_null(KillmailParticipant::CorporationId))
                    .col(big_integer_null(KillmailParticipant::AllianceId))
                    .col(big_integer_null(KillmailParticipant::ShipTypeId))
                    .col(string_len(KillmailParticipant::Role, 16))
                    .col(big_integer(KillmailParticipant::Damage))
                    .primary_key(
                        &mut Index::create()
                            .col(KillmailParticipant::KillmailId)
                            .col(KillmailParticipant::CharacterId),
                    )
                    .foreign_key(
                        &mut ForeignKey::create()
                            .name(FK_KILLMAIL_PARTICIPANT_KILLMAIL_ID)
                            .from(KillmailParticipant::Table, KillmailParticipant::KillmailId)
                            .to(Killmail::Table, Killmail::KillmailId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_KILLMAIL_PARTICIPANT_CHARACTER_ID)
                    .table(KillmailParticipant::Table)
                    .col(KillmailParticipant::CharacterId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_KILLMAIL_PARTICIPANT_CHARACTER_ID)
                    .table(KillmailParticipant::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(KillmailParticipant::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum KillmailParticipant {
    Table,
    KillmailId,
    CharacterId,
    CorporationId,
    AllianceId,
    ShipTypeId,
    Role,
    Damage,
}
