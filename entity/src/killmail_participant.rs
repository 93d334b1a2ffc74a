use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::ParticipantRole;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "killmail_participant")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub killmail_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub character_id: i64,
    pub corporation_id: Option<i64>,
    pub alliance_id: Option<i64>,
    pub ship_type_id: Option<i64>,
    pub role: ParticipantRole,
    pub damage: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::killmail::Entity",
        from = "Column::KillmailId",
        to = "super::killmail::Column::KillmailId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Killmail,
}

impl Related<super::killmail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Killmail.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
