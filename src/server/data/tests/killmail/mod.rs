use chrono::{Duration, Utc};
use tallyman_test_utils::prelude::*;

use super::record;
use crate::server::{
    data::{
        campaign_killmail::CampaignKillmailRepository, killmail::KillmailRepository,
        participant::ParticipantRepository,
    },
    model::campaign::CampaignLink,
};

mod delete_older_than;
mod insert_if_absent;
mod upsert_killmail;
