use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "killmail")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub killmail_id: i64,
    pub content_hash: String,
    pub occurred_at: DateTime,
    pub solar_system_id: i64,
    pub victim_character_id: Option<i64>,
    pub victim_corporation_id: Option<i64>,
    pub victim_alliance_id: Option<i64>,
    pub victim_ship_type_id: i64,
    pub total_value: f64,
    pub attacker_count: i32,
    pub is_npc: bool,
    pub is_solo: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::killmail_participant::Entity")]
    KillmailParticipant,
}

impl Related<super::killmail_participant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::KillmailParticipant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
