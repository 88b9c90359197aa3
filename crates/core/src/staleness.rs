//! Lead staleness
//!
//! A lead is stale once its last edit is more than a threshold of whole days
//! away from "now". Days are counted as the ceiling of the absolute
//! difference, so an edit one minute ago already counts as one day and an
//! edit in the future counts the same as one in the past.

use chrono::{DateTime, TimeZone, Utc};

/// Days without an update before a lead is considered stale
pub const DEFAULT_STALE_THRESHOLD_DAYS: i64 = 3;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Whole days between `last_edit` and `now`, rounded up
pub fn days_since<Tz: TimeZone>(last_edit: DateTime<Utc>, now: &DateTime<Tz>) -> i64 {
    let elapsed = (now.with_timezone(&Utc) - last_edit).num_milliseconds().abs();
    (elapsed + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
}

pub fn is_stale<Tz: TimeZone>(last_edit: DateTime<Utc>, now: &DateTime<Tz>, threshold_days: i64) -> bool {
    days_since(last_edit, now) > threshold_days
}
