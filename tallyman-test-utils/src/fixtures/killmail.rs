//! Upstream killmail payloads.

pub mod factory {
    //! JSON bodies shaped like zKillboard and ESI responses.
    //!
    //! Character IDs are derived from the killmail ID so that fixtures with different IDs never
    //! share participants unless a test says so.

    use chrono::{DateTime, SecondsFormat, Utc};
    use serde_json::{json, Value};

    use crate::constant::{TEST_SHIP_TYPE_ID, TEST_SYSTEM_ID};

    pub fn victim_character_id(killmail_id: i64) -> i64 {
        90_000_000 + killmail_id
    }

    pub fn attacker_character_id(killmail_id: i64) -> i64 {
        91_000_000 + killmail_id
    }

    fn body(killmail_id: i64, occurred_at: DateTime<Utc>) -> Value {
        json!({
            "killmail_id": killmail_id,
            "killmail_time": occurred_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            "solar_system_id": TEST_SYSTEM_ID,
            "victim": {
                "character_id": victim_character_id(killmail_id),
                "corporation_id": 98000001,
                "alliance_id": 99000001,
                "ship_type_id": TEST_SHIP_TYPE_ID,
                "damage_taken": 1200
            },
            "attackers": [
                {
                    "character_id": attacker_character_id(killmail_id),
                    "corporation_id": 98000002,
                    "alliance_id": 99000002,
                    "ship_type_id": 603,
                    "damage_done": 1200,
                    "final_blow": true
                }
            ]
        })
    }

    fn zkb(hash: &str) -> Value {
        json!({ "hash": hash, "totalValue": 10_500_000.0, "npc": false, "solo": true })
    }

    /// A complete zKillboard entry: killmail body plus `zkb` metadata.
    pub fn zkill_entry(killmail_id: i64, hash: &str, occurred_at: DateTime<Utc>) -> Value {
        let mut entry = body(killmail_id, occurred_at);
        entry["zkb"] = zkb(hash);
        entry
    }

    /// A summary zKillboard entry that must be hydrated from ESI.
    pub fn zkill_summary(killmail_id: i64, hash: &str) -> Value {
        json!({ "killmail_id": killmail_id, "zkb": zkb(hash) })
    }

    /// ESI `/killmails/{id}/{hash}/` response body.
    pub fn esi_killmail(killmail_id: i64, occurred_at: DateTime<Utc>) -> Value {
        body(killmail_id, occurred_at)
    }
}
