//! Scope planning: turning active campaigns into the fewest upstream fetches.
//!
//! zKillboard queries are scoped to a single location or entity, and campaigns routinely
//! overlap (two campaigns watching the same system, an alliance campaign alongside one for a
//! member corporation). Planning collapses those overlaps so each killmail stream is pulled
//! once per run.
//!
//! Planning is pure: it reads nothing and writes nothing, which keeps the dedup rules testable
//! in isolation.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::EntityKind;

use crate::server::model::{
    campaign::CampaignConfig,
    pipeline::{FetchPlan, Scope},
};

/// Campaigns feeding a scope while planning is in progress.
#[derive(Debug)]
struct Feeds {
    campaign_ids: BTreeSet<i32>,
    earliest_start: DateTime<Utc>,
}

impl Feeds {
    fn new(campaign: &CampaignConfig) -> Self {
        Self {
            campaign_ids: BTreeSet::from([campaign.id]),
            earliest_start: campaign.start_date,
        }
    }

    fn add(&mut self, campaign: &CampaignConfig) {
        self.campaign_ids.insert(campaign.id);
        self.earliest_start = self.earliest_start.min(campaign.start_date);
    }
}

fn feed(feeds: &mut BTreeMap<Scope, Feeds>, scope: Scope, campaign: &CampaignConfig) {
    feeds
        .entry(scope)
        .and_modify(|f| f.add(campaign))
        .or_insert_with(|| Feeds::new(campaign));
}

/// Compute the deduplicated fetch plan for a set of active campaigns.
///
/// Location-based campaigns (any campaign with at least one location filter) collapse by exact
/// location. Entity-based campaigns contribute every tracked entity, friendly and target, and
/// are then deduplicated by hierarchy: alliances are always planned, a corporation whose
/// alliance is planned folds into that alliance, and a character folds into its planned
/// alliance or corporation. Entities with no planned ancestor are planned on their own, even
/// when they overlap another plan without nesting under it.
///
/// # Arguments
/// - `campaigns` - Active campaigns with their locations and tracked entities
///
/// # Returns
/// Location plans first (systems, constellations, regions), then alliance, corporation and
/// character plans, each group sorted by ID. Every plan lists the campaigns it feeds.
pub fn plan(campaigns: &[CampaignConfig]) -> Vec<FetchPlan> {
    let mut locations: BTreeMap<Scope, Feeds> = BTreeMap::new();
    let mut alliances: BTreeMap<Scope, Feeds> = BTreeMap::new();
    let mut corporations: BTreeMap<Scope, Feeds> = BTreeMap::new();
    let mut characters: BTreeMap<Scope, Feeds> = BTreeMap::new();

    let mut entity_campaigns = Vec::new();
    for campaign in campaigns {
        if campaign.is_location_based() {
            for location in &campaign.locations {
                feed(
                    &mut locations,
                    Scope::Location(location.kind, location.id),
                    campaign,
                );
            }
        } else if !campaign.entities.is_empty() {
            entity_campaigns.push(campaign);
        } else {
            tracing::warn!(
                campaign_id = campaign.id,
                "Campaign {} has no locations or tracked entities, nothing to fetch",
                campaign.name
            );
        }
    }

    let tracked = |kind: EntityKind| {
        entity_campaigns.iter().flat_map(move |campaign| {
            campaign
                .entities
                .iter()
                .filter(move |entity| entity.kind == kind)
                .map(move |entity| (*campaign, entity))
        })
    };

    for (campaign, alliance) in tracked(EntityKind::Alliance) {
        feed(
            &mut alliances,
            Scope::Entity(EntityKind::Alliance, alliance.id),
            campaign,
        );
    }

    // Corporations folded into an alliance plan, so their characters fold there too.
    let mut folded_corporations: HashMap<i64, Scope> = HashMap::new();

    for (campaign, corporation) in tracked(EntityKind::Corporation) {
        let alliance_scope = corporation
            .alliance_id
            .map(|id| Scope::Entity(EntityKind::Alliance, id))
            .filter(|scope| alliances.contains_key(scope));

        match alliance_scope {
            Some(scope) => {
                tracing::debug!(
                    campaign_id = campaign.id,
                    "Corporation {} covered by {}",
                    corporation.id,
                    scope
                );
                feed(&mut alliances, scope, campaign);
                folded_corporations.insert(corporation.id, scope);
            }
            None => feed(
                &mut corporations,
                Scope::Entity(EntityKind::Corporation, corporation.id),
                campaign,
            ),
        }
    }

    for (campaign, character) in tracked(EntityKind::Character) {
        let alliance_scope = character
            .alliance_id
            .map(|id| Scope::Entity(EntityKind::Alliance, id))
            .filter(|scope| alliances.contains_key(scope));
        let corporation_scope = character.corporation_id.and_then(|id| {
            folded_corporations.get(&id).copied().or_else(|| {
                Some(Scope::Entity(EntityKind::Corporation, id))
                    .filter(|scope| corporations.contains_key(scope))
            })
        });

        match alliance_scope.or(corporation_scope) {
            Some(scope @ Scope::Entity(EntityKind::Alliance, _)) => {
                feed(&mut alliances, scope, campaign)
            }
            Some(scope) => feed(&mut corporations, scope, campaign),
            None => feed(
                &mut characters,
                Scope::Entity(EntityKind::Character, character.id),
                campaign,
            ),
        }
    }

    let plans: Vec<FetchPlan> = [locations, alliances, corporations, characters]
        .into_iter()
        .flat_map(|group| group.into_iter())
        .map(|(scope, feeds)| FetchPlan {
            scope,
            campaign_ids: feeds.campaign_ids.into_iter().collect(),
            earliest_start: feeds.earliest_start,
        })
        .collect();

    tracing::debug!(
        "Planned {} scope(s) for {} active campaign(s)",
        plans.len(),
        campaigns.len()
    );

    plans
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use entity::sea_orm_active_enums::{EntitySide, LocationKind};

    use super::*;
    use crate::server::model::campaign::{LocationFilter, TrackedEntity};

    fn start(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, day, 0, 0, 0).unwrap()
    }

    fn campaign(id: i32, day: u32) -> CampaignConfig {
        CampaignConfig {
            id,
            name: format!("campaign {}", id),
            start_date: start(day),
            end_date: None,
            locations: Vec::new(),
            entities: Vec::new(),
        }
    }

    fn entity(
        kind: EntityKind,
        id: i64,
        corporation_id: Option<i64>,
        alliance_id: Option<i64>,
    ) -> TrackedEntity {
        TrackedEntity {
            kind,
            id,
            side: EntitySide::Friendly,
            corporation_id,
            alliance_id,
        }
    }

    fn scopes(plans: &[FetchPlan]) -> Vec<Scope> {
        plans.iter().map(|plan| plan.scope).collect()
    }

    /// Expect campaigns watching the same system to share one plan
    #[test]
    fn test_same_location_collapses() {
        let mut first = campaign(1, 5);
        first.locations.push(LocationFilter {
            kind: LocationKind::System,
            id: 30000142,
        });
        let mut second = campaign(2, 1);
        second.locations.push(LocationFilter {
            kind: LocationKind::System,
            id: 30000142,
        });

        let plans = plan(&[first, second]);

        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].campaign_ids, vec![1, 2]);
        assert_eq!(plans[0].earliest_start, start(1));
    }

    /// Expect a corporation inside a separately tracked alliance to produce only the alliance plan
    #[test]
    fn test_alliance_subsumes_corporation() {
        let mut alliance_campaign = campaign(1, 1);
        alliance_campaign
            .entities
            .push(entity(EntityKind::Alliance, 99000001, None, None));
        let mut corporation_campaign = campaign(2, 2);
        corporation_campaign.entities.push(entity(
            EntityKind::Corporation,
            98000001,
            None,
            Some(99000001),
        ));

        let plans = plan(&[alliance_campaign, corporation_campaign]);

        assert_eq!(
            scopes(&plans),
            vec![Scope::Entity(EntityKind::Alliance, 99000001)]
        );
        assert_eq!(plans[0].campaign_ids, vec![1, 2]);
    }

    /// Expect characters to fold into a planned corporation, or into the alliance above a folded one
    #[test]
    fn test_character_folds_into_broadest_planned_ancestor() {
        let mut c = campaign(1, 1);
        c.entities.extend([
            entity(EntityKind::Alliance, 99000001, None, None),
            entity(EntityKind::Corporation, 98000001, None, Some(99000001)),
            entity(EntityKind::Corporation, 98000002, None, None),
            // member of a folded corporation, alliance not recorded
            entity(EntityKind::Character, 90000001, Some(98000001), None),
            // member of a planned standalone corporation
            entity(EntityKind::Character, 90000002, Some(98000002), None),
            // unaffiliated
            entity(EntityKind::Character, 90000003, Some(98000003), None),
        ]);

        let plans = plan(&[c]);

        assert_eq!(
            scopes(&plans),
            vec![
                Scope::Entity(EntityKind::Alliance, 99000001),
                Scope::Entity(EntityKind::Corporation, 98000002),
                Scope::Entity(EntityKind::Character, 90000003),
            ]
        );
    }

    /// Expect two corporations sharing no alliance to stay as disjoint plans
    #[test]
    fn test_non_nested_entities_stay_disjoint() {
        let mut first = campaign(1, 1);
        first.entities.push(entity(
            EntityKind::Corporation,
            98000001,
            None,
            Some(99000001),
        ));
        let mut second = campaign(2, 1);
        second.entities.push(entity(
            EntityKind::Corporation,
            98000002,
            None,
            Some(99000002),
        ));

        let plans = plan(&[first, second]);

        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].campaign_ids, vec![1]);
        assert_eq!(plans[1].campaign_ids, vec![2]);
    }

    /// Expect target entities to be planned alongside friendly ones
    #[test]
    fn test_targets_are_planned() {
        let mut c = campaign(1, 1);
        c.entities.push(entity(EntityKind::Alliance, 99000001, None, None));
        c.entities.push(TrackedEntity {
            side: EntitySide::Target,
            ..entity(EntityKind::Alliance, 99000002, None, None)
        });

        let plans = plan(&[c]);

        assert_eq!(plans.len(), 2);
    }

    /// Expect location plans to come before entity plans
    #[test]
    fn test_locations_planned_first() {
        let mut entity_campaign = campaign(1, 1);
        entity_campaign
            .entities
            .push(entity(EntityKind::Alliance, 99000001, None, None));
        let mut location_campaign = campaign(2, 1);
        location_campaign.locations.push(LocationFilter {
            kind: LocationKind::Region,
            id: 10000002,
        });
        location_campaign.locations.push(LocationFilter {
            kind: LocationKind::System,
            id: 30000142,
        });

        let plans = plan(&[entity_campaign, location_campaign]);

        assert_eq!(
            scopes(&plans),
            vec![
                Scope::Location(LocationKind::System, 30000142),
                Scope::Location(LocationKind::Region, 10000002),
                Scope::Entity(EntityKind::Alliance, 99000001),
            ]
        );
    }

    /// Expect a location-based campaign's entities to classify only, not to add plans
    #[test]
    fn test_location_campaign_entities_not_planned() {
        let mut c = campaign(1, 1);
        c.locations.push(LocationFilter {
            kind: LocationKind::System,
            id: 30000142,
        });
        c.entities.push(entity(EntityKind::Alliance, 99000001, None, None));

        let plans = plan(&[c]);

        assert_eq!(
            scopes(&plans),
            vec![Scope::Location(LocationKind::System, 30000142)]
        );
    }

    /// Expect a campaign with nothing to track to produce no plan and no error
    #[test]
    fn test_empty_campaign_produces_no_plan() {
        let plans = plan(&[campaign(1, 1)]);

        assert!(plans.is_empty());
    }
}
