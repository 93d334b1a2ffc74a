use std::time::Duration;

use chrono::Utc;
use tallyman_test_utils::prelude::*;

use crate::server::{data::run::RunRepository, model::pipeline::RunSummary};

mod record;
