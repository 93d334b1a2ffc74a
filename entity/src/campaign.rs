use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "campaign")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub start_date: DateTime,
    pub end_date: Option<DateTime>,
    pub is_active: bool,
    pub last_run: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::campaign_entity::Entity")]
    CampaignEntity,
    #[sea_orm(has_many = "super::campaign_location::Entity")]
    CampaignLocation,
}

impl Related<super::campaign_entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CampaignEntity.def()
    }
}

impl Related<super::campaign_location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CampaignLocation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
