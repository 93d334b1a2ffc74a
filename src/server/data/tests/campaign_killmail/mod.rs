use chrono::Utc;
use tallyman_test_utils::prelude::*;

use super::record;
use crate::server::{
    data::{campaign_killmail::CampaignKillmailRepository, killmail::KillmailRepository},
    model::campaign::CampaignLink,
};

mod link;
