use chrono::{Duration, Utc};
use entity::sea_orm_active_enums::{EntityKind, EntitySide, LocationKind};
use tallyman_test_utils::prelude::*;

use crate::server::data::campaign::{CampaignRepository, END_DATE_GRACE};

mod find_active;
mod update_last_run;
