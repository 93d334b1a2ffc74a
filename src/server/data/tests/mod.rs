use chrono::{DateTime, Utc};
use tallyman_test_utils::prelude::*;

use crate::server::model::killmail::{Attacker, RawRecord, Victim};

mod campaign;
mod campaign_killmail;
mod killmail;
mod lock;
mod participant;
mod run;
mod watermark;

/// Killmail with a victim and one final-blow attacker.
fn record(killmail_id: i64, content_hash: &str, occurred_at: DateTime<Utc>) -> RawRecord {
    RawRecord {
        killmail_id,
        content_hash: content_hash.to_string(),
        occurred_at,
        solar_system_id: TEST_SYSTEM_ID,
        total_value: 10_500_000.0,
        is_npc: false,
        is_solo: true,
        victim: Victim {
            character_id: Some(factory::victim_character_id(killmail_id)),
            corporation_id: Some(98000001),
            alliance_id: Some(99000001),
            ship_type_id: 587,
            damage_taken: 1200,
        },
        attackers: vec![Attacker {
            character_id: Some(factory::attacker_character_id(killmail_id)),
            corporation_id: Some(98000002),
            alliance_id: Some(99000002),
            ship_type_id: Some(603),
            damage_done: 1200,
            final_blow: true,
        }],
    }
}
