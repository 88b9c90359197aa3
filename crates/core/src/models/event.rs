//! Event model - appointments booked against a lead

use std::str::FromStr;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Lead;
use crate::error::{Error, Result};
use crate::schedule::{format_time_range, EventTimes};

/// Reminder offset applied when the form does not set one
pub const DEFAULT_REMINDER_MINUTES: u32 = 15;

/// Closed set of event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Inspection,
    Call,
    Meeting,
    #[default]
    Other,
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Inspection => "Inspection",
            EventKind::Call => "Call",
            EventKind::Meeting => "Car Sales Meeting",
            EventKind::Other => "Other",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            EventKind::Inspection => "🛠️",
            EventKind::Call => "📞",
            EventKind::Meeting => "🚗",
            EventKind::Other => "📋",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for EventKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inspection" => Ok(EventKind::Inspection),
            "call" => Ok(EventKind::Call),
            "meeting" => Ok(EventKind::Meeting),
            "other" => Ok(EventKind::Other),
            other => Err(Error::Validation(format!("unknown event type '{}'", other))),
        }
    }
}

/// A scheduled event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub kind: EventKind,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Weak reference, looked up by id
    pub lead_id: String,
    pub lead_name: String,
    pub notes: Option<String>,
    /// Minutes before the start
    pub reminder_offset: u32,
}

impl Event {
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    pub fn reminder_time(&self) -> DateTime<Utc> {
        self.start_time - Duration::minutes(i64::from(self.reminder_offset))
    }

    /// `HH:MM - HH:MM` in the given zone
    pub fn time_range<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        format_time_range(self.start_time, self.end_time, tz)
    }

    /// Merge the set fields of a patch; the id never changes.
    pub fn patched(&self, patch: &EventPatch) -> Self {
        let mut event = self.clone();
        if let Some(title) = &patch.title {
            event.title = title.clone();
        }
        if let Some(kind) = patch.kind {
            event.kind = kind;
        }
        if let Some(times) = patch.times {
            event.start_time = times.start;
            event.end_time = times.end;
        }
        if let Some(notes) = &patch.notes {
            event.notes = normalize_notes(notes);
        }
        if let Some(offset) = patch.reminder_offset {
            event.reminder_offset = offset;
        }
        event
    }

    pub(crate) fn validate(&self) -> Result<()> {
        validate_fields(&self.title, self.start_time, self.end_time)
    }
}

/// Form data for a new event, before an id is assigned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub kind: EventKind,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub lead_id: String,
    pub lead_name: String,
    pub notes: Option<String>,
    pub reminder_offset: u32,
}

impl EventDraft {
    /// Draft booked against a lead; the lead name is denormalized here.
    pub fn new(title: impl Into<String>, lead: &Lead, times: EventTimes) -> Self {
        Self {
            title: title.into(),
            kind: EventKind::default(),
            start_time: times.start,
            end_time: times.end,
            lead_id: lead.id.clone(),
            lead_name: lead.customer_name.clone(),
            notes: None,
            reminder_offset: DEFAULT_REMINDER_MINUTES,
        }
    }

    pub fn with_kind(mut self, kind: EventKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = normalize_notes(&notes.into());
        self
    }

    pub fn with_reminder_offset(mut self, minutes: u32) -> Self {
        self.reminder_offset = minutes;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_fields(&self.title, self.start_time, self.end_time)
    }

    pub fn into_event(self, id: Uuid) -> Event {
        Event {
            id,
            title: self.title,
            kind: self.kind,
            start_time: self.start_time,
            end_time: self.end_time,
            lead_id: self.lead_id,
            lead_name: self.lead_name,
            notes: self.notes,
            reminder_offset: self.reminder_offset,
        }
    }
}

/// Partial update for an existing event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub kind: Option<EventKind>,
    pub times: Option<EventTimes>,
    /// An empty string clears the notes
    pub notes: Option<String>,
    pub reminder_offset: Option<u32>,
}

impl EventPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn kind(mut self, kind: EventKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn times(mut self, times: EventTimes) -> Self {
        self.times = Some(times);
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn reminder_offset(mut self, minutes: u32) -> Self {
        self.reminder_offset = Some(minutes);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn normalize_notes(notes: &str) -> Option<String> {
    let trimmed = notes.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn validate_fields(title: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::Validation("event title is required".to_string()));
    }
    if end <= start {
        return Err(Error::InvalidSpan { start, end });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn times() -> EventTimes {
        let start = Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap();
        EventTimes {
            start,
            end: start + Duration::hours(1),
        }
    }

    fn make_draft() -> EventDraft {
        let lead = Lead::new("2", "Huynh Xuan Phong", Utc::now());
        EventDraft::new("Inspect Civic", &lead, times())
    }

    #[test]
    fn test_draft_denormalizes_lead() {
        let draft = make_draft();
        assert_eq!(draft.lead_id, "2");
        assert_eq!(draft.lead_name, "Huynh Xuan Phong");
        assert_eq!(draft.kind, EventKind::Other);
        assert_eq!(draft.reminder_offset, DEFAULT_REMINDER_MINUTES);
    }

    #[test]
    fn test_draft_requires_title() {
        let mut draft = make_draft();
        draft.title = "   ".to_string();
        assert!(matches!(draft.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_draft_rejects_inverted_span() {
        let mut draft = make_draft();
        draft.end_time = draft.start_time;
        assert!(matches!(draft.validate(), Err(Error::InvalidSpan { .. })));
    }

    #[test]
    fn test_blank_notes_are_dropped() {
        let draft = make_draft().with_notes("  ");
        assert_eq!(draft.notes, None);
    }

    #[test]
    fn test_patch_keeps_unset_fields() {
        let event = make_draft().with_notes("bring papers").into_event(Uuid::new_v4());
        let patched = event.patched(&EventPatch::new().title("Call back"));

        assert_eq!(patched.id, event.id);
        assert_eq!(patched.title, "Call back");
        assert_eq!(patched.start_time, event.start_time);
        assert_eq!(patched.end_time, event.end_time);
        assert_eq!(patched.notes.as_deref(), Some("bring papers"));
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(EventPatch::new().is_empty());
        assert!(!EventPatch::new().reminder_offset(0).is_empty());
        assert!(!EventPatch::new().notes("").is_empty());
    }

    #[test]
    fn test_patch_clears_notes() {
        let event = make_draft().with_notes("bring papers").into_event(Uuid::new_v4());
        let patched = event.patched(&EventPatch::new().notes(""));
        assert_eq!(patched.notes, None);
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("Meeting".parse::<EventKind>().unwrap(), EventKind::Meeting);
        assert!("lunch".parse::<EventKind>().is_err());
        assert_eq!(EventKind::Meeting.to_string(), "Car Sales Meeting");
    }

    #[test]
    fn test_reminder_time() {
        let event = make_draft().into_event(Uuid::new_v4());
        assert_eq!(event.reminder_time(), event.start_time - Duration::minutes(15));
    }
}
