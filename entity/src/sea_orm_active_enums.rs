use sea_orm::entity::prelude::*;

/// Kind of location a campaign can be scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum LocationKind {
    #[sea_orm(string_value = "system")]
    System,
    #[sea_orm(string_value = "constellation")]
    Constellation,
    #[sea_orm(string_value = "region")]
    Region,
}

/// Kind of EVE entity a campaign can track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum EntityKind {
    #[sea_orm(string_value = "alliance")]
    Alliance,
    #[sea_orm(string_value = "corporation")]
    Corporation,
    #[sea_orm(string_value = "character")]
    Character,
}

/// Which side of a campaign a tracked entity is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum EntitySide {
    #[sea_orm(string_value = "friendly")]
    Friendly,
    #[sea_orm(string_value = "target")]
    Target,
}

/// Role a character played in a killmail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ParticipantRole {
    #[sea_orm(string_value = "victim")]
    Victim,
    #[sea_orm(string_value = "attacker")]
    Attacker,
    #[sea_orm(string_value = "final_blow")]
    FinalBlow,
}
