//! Upcoming schedule grouped by calendar day

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone};
use serde::{Serialize, Serializer};

use super::format_date;
use crate::models::Event;

/// Relative label of a schedule day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayLabel {
    Today,
    Tomorrow,
    /// Later in the current Monday-start week
    ThisWeek(NaiveDate),
    /// Later in the current calendar month
    ThisMonth(NaiveDate),
    Later(NaiveDate),
}

impl fmt::Display for DayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayLabel::Today => write!(f, "Today"),
            DayLabel::Tomorrow => write!(f, "Tomorrow"),
            DayLabel::ThisWeek(date) => write!(f, "{}", date.format("%A")),
            DayLabel::ThisMonth(date) => write!(f, "{}", date.format("%A, %b %-d")),
            DayLabel::Later(date) => write!(f, "{}", date.format("%A, %b %-d, %Y")),
        }
    }
}

impl Serialize for DayLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Label `date` relative to `today`
pub fn day_label(date: NaiveDate, today: NaiveDate) -> DayLabel {
    if date == today {
        DayLabel::Today
    } else if today.succ_opt() == Some(date) {
        DayLabel::Tomorrow
    } else if date.iso_week() == today.iso_week() {
        DayLabel::ThisWeek(date)
    } else if date.year() == today.year() && date.month() == today.month() {
        DayLabel::ThisMonth(date)
    } else {
        DayLabel::Later(date)
    }
}

/// Events sharing one calendar day
#[derive(Debug, Clone, Serialize)]
pub struct DayBucket {
    pub label: DayLabel,
    /// `YYYY-MM-DD`
    pub date_key: String,
    pub date: NaiveDate,
    /// Sorted by start time
    pub events: Vec<Event>,
}

impl DayBucket {
    fn open(date: NaiveDate, today: NaiveDate) -> Self {
        Self {
            label: day_label(date, today),
            date_key: date.format("%Y-%m-%d").to_string(),
            date,
            events: Vec::new(),
        }
    }

    /// Short date shown next to the label
    pub fn subtitle(&self) -> String {
        format_date(self.date)
    }
}

/// Events from today onward, bucketed by day in `now`'s time zone.
///
/// Days are compared at calendar granularity, so an event earlier today is
/// still listed. Buckets and the events inside them are in ascending start
/// order; events with equal starts keep their input order.
pub fn group_upcoming<Tz: TimeZone>(events: &[Event], now: &DateTime<Tz>) -> Vec<DayBucket> {
    let tz = now.timezone();
    let today = now.date_naive();

    let mut upcoming: Vec<(NaiveDate, &Event)> = events
        .iter()
        .map(|event| (event.start_time.with_timezone(&tz).date_naive(), event))
        .filter(|(date, _)| *date >= today)
        .collect();
    upcoming.sort_by_key(|(_, event)| event.start_time);

    let mut buckets: Vec<DayBucket> = Vec::new();
    for (date, event) in upcoming {
        match buckets.last_mut() {
            Some(bucket) if bucket.date == date => bucket.events.push(event.clone()),
            _ => {
                let mut bucket = DayBucket::open(date, today);
                bucket.events.push(event.clone());
                buckets.push(bucket);
            }
        }
    }
    buckets
}

/// Events booked against one lead, in input order
pub fn events_for_lead(events: &[Event], lead_id: &str) -> Vec<Event> {
    events
        .iter()
        .filter(|event| event.lead_id == lead_id)
        .cloned()
        .collect()
}
