use chrono::{Duration, Utc};
use tallyman_test_utils::prelude::*;

use crate::server::data::watermark::WatermarkRepository;

mod write_watermark;
