//! Killmail records as they cross the fetch boundary.
//!
//! zKillboard answers scope queries either with complete killmails or with bare
//! `killmail_id` + `zkb` summaries that must be hydrated from ESI. Both shapes are parsed
//! strictly into [`FetchedEntry`]; anything in between is rejected as malformed.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::ParticipantRole;
use serde::{Deserialize, Serialize};

/// zKillboard metadata attached to every entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZkbMeta {
    /// Upstream content hash; also the second half of the ESI killmail URL.
    pub hash: String,
    #[serde(rename = "totalValue", default)]
    pub total_value: f64,
    #[serde(default)]
    pub npc: bool,
    #[serde(default)]
    pub solo: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Victim {
    pub character_id: Option<i64>,
    pub corporation_id: Option<i64>,
    pub alliance_id: Option<i64>,
    pub ship_type_id: i64,
    #[serde(default)]
    pub damage_taken: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attacker {
    pub character_id: Option<i64>,
    pub corporation_id: Option<i64>,
    pub alliance_id: Option<i64>,
    pub ship_type_id: Option<i64>,
    #[serde(default)]
    pub damage_done: i64,
    #[serde(default)]
    pub final_blow: bool,
}

/// Killmail body as served by ESI `/killmails/{id}/{hash}/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KillmailDetail {
    pub killmail_id: i64,
    pub killmail_time: DateTime<Utc>,
    pub solar_system_id: i64,
    pub victim: Victim,
    pub attackers: Vec<Attacker>,
}

/// A summary entry that still needs its body.
#[derive(Debug, Clone, PartialEq)]
pub struct KillmailRef {
    pub killmail_id: i64,
    pub zkb: ZkbMeta,
}

/// A complete killmail ready for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub killmail_id: i64,
    pub content_hash: String,
    pub occurred_at: DateTime<Utc>,
    pub solar_system_id: i64,
    pub total_value: f64,
    pub is_npc: bool,
    pub is_solo: bool,
    pub victim: Victim,
    pub attackers: Vec<Attacker>,
}

impl RawRecord {
    pub fn from_parts(zkb: ZkbMeta, detail: KillmailDetail) -> Self {
        Self {
            killmail_id: detail.killmail_id,
            content_hash: zkb.hash,
            occurred_at: detail.killmail_time,
            solar_system_id: detail.solar_system_id,
            total_value: zkb.total_value,
            is_npc: zkb.npc,
            is_solo: zkb.solo,
            victim: detail.victim,
            attackers: detail.attackers,
        }
    }

    pub fn involvement(&self) -> Involvement {
        Involvement {
            victim: Affiliation {
                character_id: self.victim.character_id,
                corporation_id: self.victim.corporation_id,
                alliance_id: self.victim.alliance_id,
            },
            attackers: self
                .attackers
                .iter()
                .map(|a| Affiliation {
                    character_id: a.character_id,
                    corporation_id: a.corporation_id,
                    alliance_id: a.alliance_id,
                })
                .collect(),
        }
    }

    /// Characters involved in the killmail with their role.
    ///
    /// Entries without a character (NPCs, structures) are skipped. The victim is listed first so
    /// that a character appearing twice keeps its victim role.
    pub fn participants(&self) -> Vec<ParticipantRecord> {
        let mut seen = HashSet::new();
        let mut participants = Vec::with_capacity(self.attackers.len() + 1);

        if let Some(character_id) = self.victim.character_id {
            seen.insert(character_id);
            participants.push(ParticipantRecord {
                character_id,
                corporation_id: self.victim.corporation_id,
                alliance_id: self.victim.alliance_id,
                ship_type_id: Some(self.victim.ship_type_id),
                role: ParticipantRole::Victim,
                damage: self.victim.damage_taken,
            });
        }

        for attacker in &self.attackers {
            let Some(character_id) = attacker.character_id else {
                continue;
            };
            if !seen.insert(character_id) {
                continue;
            }

            participants.push(ParticipantRecord {
                character_id,
                corporation_id: attacker.corporation_id,
                alliance_id: attacker.alliance_id,
                ship_type_id: attacker.ship_type_id,
                role: if attacker.final_blow {
                    ParticipantRole::FinalBlow
                } else {
                    ParticipantRole::Attacker
                },
                damage: attacker.damage_done,
            });
        }

        participants
    }
}

/// One (killmail, character) participation row.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantRecord {
    pub character_id: i64,
    pub corporation_id: Option<i64>,
    pub alliance_id: Option<i64>,
    pub ship_type_id: Option<i64>,
    pub role: ParticipantRole,
    pub damage: i64,
}

/// Strictly typed zKillboard page entry.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchedEntry {
    Full(RawRecord),
    Summary(KillmailRef),
}

impl FetchedEntry {
    pub fn killmail_id(&self) -> i64 {
        match self {
            FetchedEntry::Full(record) => record.killmail_id,
            FetchedEntry::Summary(reference) => reference.killmail_id,
        }
    }

    /// Occurrence time when known without hydration.
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        match self {
            FetchedEntry::Full(record) => Some(record.occurred_at),
            FetchedEntry::Summary(_) => None,
        }
    }
}

/// zKillboard page entry exactly as served, before shape validation.
#[derive(Debug, Deserialize)]
pub struct ZkillEntry {
    pub killmail_id: i64,
    pub zkb: ZkbMeta,
    pub killmail_time: Option<DateTime<Utc>>,
    pub solar_system_id: Option<i64>,
    pub victim: Option<Victim>,
    pub attackers: Option<Vec<Attacker>>,
}

impl TryFrom<ZkillEntry> for FetchedEntry {
    type Error = String;

    fn try_from(entry: ZkillEntry) -> Result<Self, Self::Error> {
        if entry.zkb.hash.trim().is_empty() {
            return Err(format!("killmail {} has an empty hash", entry.killmail_id));
        }

        match (
            entry.killmail_time,
            entry.solar_system_id,
            entry.victim,
            entry.attackers,
        ) {
            (Some(killmail_time), Some(solar_system_id), Some(victim), Some(attackers)) => {
                Ok(FetchedEntry::Full(RawRecord::from_parts(
                    entry.zkb,
                    KillmailDetail {
                        killmail_id: entry.killmail_id,
                        killmail_time,
                        solar_system_id,
                        victim,
                        attackers,
                    },
                )))
            }
            (None, None, None, None) => Ok(FetchedEntry::Summary(KillmailRef {
                killmail_id: entry.killmail_id,
                zkb: entry.zkb,
            })),
            _ => Err(format!(
                "killmail {} carries a partial body",
                entry.killmail_id
            )),
        }
    }
}

/// Character, corporation and alliance of one side of a killmail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Affiliation {
    pub character_id: Option<i64>,
    pub corporation_id: Option<i64>,
    pub alliance_id: Option<i64>,
}

/// Who was on a killmail, as needed to attribute it to campaigns.
#[derive(Debug, Clone, PartialEq)]
pub struct Involvement {
    pub victim: Affiliation,
    pub attackers: Vec<Affiliation>,
}

impl Involvement {
    /// Rebuild involvement from a stored killmail and its participant rows.
    ///
    /// Attackers without a character were never stored as participants and are absent here.
    pub fn from_stored(
        killmail: &entity::killmail::Model,
        participants: &[entity::killmail_participant::Model],
    ) -> Self {
        Self {
            victim: Affiliation {
                character_id: killmail.victim_character_id,
                corporation_id: killmail.victim_corporation_id,
                alliance_id: killmail.victim_alliance_id,
            },
            attackers: participants
                .iter()
                .filter(|p| p.role != ParticipantRole::Victim)
                .map(|p| Affiliation {
                    character_id: Some(p.character_id),
                    corporation_id: p.corporation_id,
                    alliance_id: p.alliance_id,
                })
                .collect(),
        }
    }

    /// Every affiliation on the killmail, victim first.
    pub fn all(&self) -> impl Iterator<Item = &Affiliation> {
        std::iter::once(&self.victim).chain(self.attackers.iter())
    }
}

/// What persisting a single record did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
    SkippedDuplicate,
}
