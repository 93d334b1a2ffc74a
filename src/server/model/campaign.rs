use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::{EntityKind, EntitySide, LocationKind};

use super::killmail::{Affiliation, Involvement};

/// An active campaign with its scope definition loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignConfig {
    pub id: i32,
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub locations: Vec<LocationFilter>,
    pub entities: Vec<TrackedEntity>,
}

impl CampaignConfig {
    /// Location-based campaigns are scoped by where kills happen; their tracked entities only
    /// classify participation.
    pub fn is_location_based(&self) -> bool {
        !self.locations.is_empty()
    }

    /// Decide whether a killmail belongs to this campaign.
    ///
    /// A friendly entity must be involved and the kill must fall inside the campaign window.
    /// Beyond that a target must be involved, or the killmail came through one of the
    /// campaign's locations, or the campaign tracks no targets and no locations at all.
    ///
    /// # Arguments
    /// - `killmail` - Victim and attacker affiliations
    /// - `occurred_at` - Kill time
    /// - `via_location` - The killmail was fetched through a location scope this campaign feeds
    ///
    /// # Returns
    /// - `Some(is_loss)` - The killmail counts for this campaign; `is_loss` when the victim is
    ///   friendly
    /// - `None` - The killmail does not belong to this campaign
    pub fn attribute(
        &self,
        killmail: &Involvement,
        occurred_at: DateTime<Utc>,
        via_location: bool,
    ) -> Option<bool> {
        if occurred_at < self.start_date || self.end_date.is_some_and(|end| occurred_at > end) {
            return None;
        }

        if !self.involves(EntitySide::Friendly, killmail) {
            return None;
        }

        let is_loss = self.matches_side(EntitySide::Friendly, &killmail.victim);

        let has_targets = self.entities.iter().any(|e| e.side == EntitySide::Target);
        let included = self.involves(EntitySide::Target, killmail)
            || (self.is_location_based() && via_location)
            || (!self.is_location_based() && !has_targets);

        included.then_some(is_loss)
    }

    fn involves(&self, side: EntitySide, killmail: &Involvement) -> bool {
        killmail
            .all()
            .any(|affiliation| self.matches_side(side, affiliation))
    }

    fn matches_side(&self, side: EntitySide, affiliation: &Affiliation) -> bool {
        self.entities
            .iter()
            .any(|entity| entity.side == side && entity.matches(affiliation))
    }
}

/// A killmail counted towards a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignLink {
    pub campaign_id: i32,
    pub killmail_id: i64,
    /// The victim was on the campaign's friendly side.
    pub is_loss: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationFilter {
    pub kind: LocationKind,
    pub id: i64,
}

/// A character, corporation or alliance referenced by a campaign.
///
/// `corporation_id`/`alliance_id` carry the entity's known affiliation so that narrower entities
/// can be folded into a broader scope that already covers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedEntity {
    pub kind: EntityKind,
    pub id: i64,
    pub side: EntitySide,
    pub corporation_id: Option<i64>,
    pub alliance_id: Option<i64>,
}

impl TrackedEntity {
    pub fn matches(&self, affiliation: &Affiliation) -> bool {
        let id = match self.kind {
            EntityKind::Character => affiliation.character_id,
            EntityKind::Corporation => affiliation.corporation_id,
            EntityKind::Alliance => affiliation.alliance_id,
        };

        id == Some(self.id)
    }
}
