use chrono::{Duration, Utc};
use tallyman_test_utils::{constant::TEST_LOCK_NAME, prelude::*};

use crate::server::data::lock::LockRepository;

mod delete_expired;
mod try_insert;
