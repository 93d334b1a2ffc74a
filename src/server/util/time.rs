//! Time conversion helpers.
//!
//! Timestamps are persisted as naive UTC; these helpers keep the conversion in one place and
//! provide the calendar arithmetic the zKillboard month walk needs.

use chrono::{DateTime, Datelike, NaiveDateTime, Utc};

/// Convert an aware UTC timestamp into the naive form stored in the database.
pub fn to_db(instant: DateTime<Utc>) -> NaiveDateTime {
    instant.naive_utc()
}

/// Convert a stored naive timestamp back into aware UTC.
pub fn from_db(naive: NaiveDateTime) -> DateTime<Utc> {
    naive.and_utc()
}

/// Calendar months touched by `[since, now]`, newest first.
///
/// # Arguments
/// - `since` - Start of the window
/// - `now` - End of the window
///
/// # Returns
/// `(year, month)` pairs from `now`'s month back to `since`'s month inclusive. Empty when
/// `since` is after `now`.
pub fn months_between(since: DateTime<Utc>, now: DateTime<Utc>) -> Vec<(i32, u32)> {
    let mut months = Vec::new();
    if since > now {
        return months;
    }

    let (mut year, mut month) = (now.year(), now.month());
    let (stop_year, stop_month) = (since.year(), since.month());

    loop {
        months.push((year, month));
        if (year, month) <= (stop_year, stop_month) {
            break;
        }
        if month == 1 {
            year -= 1;
            month = 12;
        } else {
            month -= 1;
        }
    }

    months
}
