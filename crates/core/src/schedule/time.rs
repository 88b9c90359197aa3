//! Event time resolution

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Event length when no end is supplied
pub const DEFAULT_EVENT_MINUTES: i64 = 60;

/// Wall-clock time with minute precision, written `HH:MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u32,
    minute: u32,
}

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(Error::InvalidTime(format!(
                "{:02}:{:02} is not a time of day",
                hour, minute
            )));
        }
        Ok(Self { hour, minute })
    }

    /// Time of day of an instant in its own zone, seconds dropped
    pub fn of<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self {
            hour: instant.hour(),
            minute: instant.minute(),
        }
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    fn to_naive(self) -> NaiveTime {
        // Range checked on construction
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl FromStr for TimeOfDay {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidTime(format!("'{}' is not in HH:MM form", s));

        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour = parse_clock_part(hour).ok_or_else(invalid)?;
        let minute = parse_clock_part(minute).ok_or_else(invalid)?;
        Self::new(hour, minute)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_string()
    }
}

/// One or two ASCII digits, as in the parts of `HH:MM`
pub(crate) fn parse_clock_part(part: &str) -> Option<u32> {
    if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Resolved start and end instants of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTimes {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl EventTimes {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Compose a local date and time of day into a UTC instant.
///
/// Ambiguous local times (clocks going back) take the earlier instant; times
/// skipped by a clock change are rejected.
pub fn local_instant<Tz: TimeZone>(date: NaiveDate, time: TimeOfDay, tz: &Tz) -> Result<DateTime<Utc>> {
    let naive = date.and_time(time.to_naive());
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| Error::InvalidTime(format!("{} does not exist in this time zone", naive)))
}

/// Start at `date` + `time`, end `duration_minutes` later
pub fn resolve_event_times<Tz: TimeZone>(
    date: NaiveDate,
    time: TimeOfDay,
    duration_minutes: i64,
    tz: &Tz,
) -> Result<EventTimes> {
    if duration_minutes <= 0 {
        return Err(Error::Validation(format!(
            "event duration must be positive, got {} minutes",
            duration_minutes
        )));
    }
    let start = local_instant(date, time, tz)?;
    Ok(EventTimes {
        start,
        end: start + Duration::minutes(duration_minutes),
    })
}

/// Independent start and end; the end must come after the start.
pub fn resolve_event_span<Tz: TimeZone>(
    start_date: NaiveDate,
    start_time: TimeOfDay,
    end_date: NaiveDate,
    end_time: TimeOfDay,
    tz: &Tz,
) -> Result<EventTimes> {
    let start = local_instant(start_date, start_time, tz)?;
    let end = local_instant(end_date, end_time, tz)?;
    if end <= start {
        return Err(Error::InvalidSpan { start, end });
    }
    Ok(EventTimes { start, end })
}

/// Top of the hour after `now`, the default start of a new event
pub fn next_available_hour<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    let top = now
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or_else(|| now.clone());
    top + Duration::hours(1)
}

/// `HH:MM - HH:MM` in the given zone
pub fn format_time_range<Tz: TimeZone>(start: DateTime<Utc>, end: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    format!(
        "{} - {}",
        start.with_timezone(tz).format("%H:%M"),
        end.with_timezone(tz).format("%H:%M")
    )
}

/// `Jun 10, 2024`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn june_10() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    #[test]
    fn test_parse_time_of_day() {
        let t: TimeOfDay = "09:05".parse().unwrap();
        assert_eq!((t.hour(), t.minute()), (9, 5));
        assert_eq!(t.to_string(), "09:05");

        let short: TimeOfDay = "7:30".parse().unwrap();
        assert_eq!(short.to_string(), "07:30");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "0930", "24:00", "12:60", "ab:cd", "-1:00", "12:345", "12:"] {
            assert!(
                matches!(bad.parse::<TimeOfDay>(), Err(Error::InvalidTime(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_serde_goes_through_range_check() {
        let t: TimeOfDay = serde_json::from_str("\"09:15\"").unwrap();
        assert_eq!(t, TimeOfDay::new(9, 15).unwrap());
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"09:15\"");

        assert!(serde_json::from_str::<TimeOfDay>("\"30:00\"").is_err());
        assert!(serde_json::from_str::<TimeOfDay>(r#"{"hour":30,"minute":0}"#).is_err());
    }

    #[test]
    fn test_default_duration_is_one_hour() {
        let times = resolve_event_times(june_10(), TimeOfDay::new(9, 0).unwrap(), DEFAULT_EVENT_MINUTES, &Utc).unwrap();
        assert_eq!(times.start, Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap());
        assert_eq!(times.end, Utc.with_ymd_and_hms(2024, 6, 10, 10, 0, 0).unwrap());
        assert_eq!(times.duration(), Duration::hours(1));
    }

    #[test]
    fn test_resolution_uses_local_zone() {
        let hcm = FixedOffset::east_opt(7 * 3600).unwrap();
        let times = resolve_event_times(june_10(), TimeOfDay::new(9, 0).unwrap(), 30, &hcm).unwrap();
        assert_eq!(times.start, Utc.with_ymd_and_hms(2024, 6, 10, 2, 0, 0).unwrap());
        assert_eq!(times.end, Utc.with_ymd_and_hms(2024, 6, 10, 2, 30, 0).unwrap());
    }

    #[test]
    fn test_late_event_crosses_midnight() {
        let times = resolve_event_times(june_10(), TimeOfDay::new(23, 30).unwrap(), 60, &Utc).unwrap();
        assert_eq!(times.end, Utc.with_ymd_and_hms(2024, 6, 11, 0, 30, 0).unwrap());
    }

    #[test]
    fn test_non_positive_duration_rejected() {
        let result = resolve_event_times(june_10(), TimeOfDay::new(9, 0).unwrap(), 0, &Utc);
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_span_composes_independently() {
        let end_date = NaiveDate::from_ymd_opt(2024, 6, 11).unwrap();
        let times = resolve_event_span(
            june_10(),
            TimeOfDay::new(16, 0).unwrap(),
            end_date,
            TimeOfDay::new(8, 0).unwrap(),
            &Utc,
        )
        .unwrap();
        assert_eq!(times.duration(), Duration::hours(16));
    }

    #[test]
    fn test_span_rejects_end_before_start() {
        let result = resolve_event_span(
            june_10(),
            TimeOfDay::new(10, 0).unwrap(),
            june_10(),
            TimeOfDay::new(9, 0).unwrap(),
            &Utc,
        );
        assert!(matches!(result, Err(Error::InvalidSpan { .. })));

        let same = resolve_event_span(
            june_10(),
            TimeOfDay::new(10, 0).unwrap(),
            june_10(),
            TimeOfDay::new(10, 0).unwrap(),
            &Utc,
        );
        assert!(same.is_err());
    }

    #[test]
    fn test_next_available_hour() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 14, 37, 12).unwrap();
        assert_eq!(next_available_hour(&now), Utc.with_ymd_and_hms(2024, 6, 10, 15, 0, 0).unwrap());

        let late = Utc.with_ymd_and_hms(2024, 6, 10, 23, 5, 0).unwrap();
        assert_eq!(next_available_hour(&late), Utc.with_ymd_and_hms(2024, 6, 11, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_next_hour_in_half_hour_zone() {
        let india = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let now = india.with_ymd_and_hms(2024, 6, 10, 9, 45, 0).unwrap();
        let next = next_available_hour(&now);
        assert_eq!(TimeOfDay::of(&next).to_string(), "10:00");
    }

    #[test]
    fn test_formatting() {
        let start = Utc.with_ymd_and_hms(2024, 6, 10, 2, 0, 0).unwrap();
        let end = start + Duration::hours(1);
        let hcm = FixedOffset::east_opt(7 * 3600).unwrap();
        assert_eq!(format_time_range(start, end, &hcm), "09:00 - 10:00");
        assert_eq!(format_date(june_10()), "Jun 10, 2024");
    }
}
