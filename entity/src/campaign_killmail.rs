use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "campaign_killmail")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub campaign_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub killmail_id: i64,
    /// The victim was on the campaign's friendly side.
    pub is_loss: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::campaign::Entity",
        from = "Column::CampaignId",
        to = "super::campaign::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Campaign,
    #[sea_orm(
        belongs_to = "super::killmail::Entity",
        from = "Column::KillmailId",
        to = "super::killmail::Column::KillmailId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Killmail,
}

impl Related<super::campaign::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campaign.def()
    }
}

impl Related<super::killmail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Killmail.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
