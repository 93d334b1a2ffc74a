use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::{EntityKind, EntitySide};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "campaign_entity")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub campaign_id: i32,
    pub entity_kind: EntityKind,
    pub entity_id: i64,
    pub side: EntitySide,
    /// Known corporation of a tracked character, used to fold it into a broader scope.
    pub corporation_id: Option<i64>,
    /// Known alliance of a tracked character or corporation.
    pub alliance_id: Option<i64>,
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
}

impl Related<super::campaign::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campaign.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
