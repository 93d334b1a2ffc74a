use chrono::Utc;
use entity::sea_orm_active_enums::ParticipantRole;
use tallyman_test_utils::prelude::*;

use super::record;
use crate::server::data::{killmail::KillmailRepository, participant::ParticipantRepository};

mod delete_except;
mod upsert_participants;
