//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use std::collections::HashSet;

use uuid::Uuid;

use crate::models::{Event, Lead};

/// Validate that an event is internally consistent
pub fn assert_event_invariants(event: &Event) {
    debug_assert!(
        event.id != Uuid::nil(),
        "Event '{}' has nil id",
        event.title
    );

    // End strictly after start
    debug_assert!(
        event.end_time > event.start_time,
        "Event {} ends at {} which is not after its start {}",
        event.id,
        event.end_time,
        event.start_time
    );

    debug_assert!(
        !event.title.trim().is_empty(),
        "Event {} has empty title",
        event.id
    );
}

/// Validate that an event collection has unique ids
pub fn assert_event_list_invariants(events: &[Event]) {
    let mut seen = HashSet::new();
    for event in events {
        assert_event_invariants(event);
        debug_assert!(
            seen.insert(event.id),
            "Event id {} appears more than once",
            event.id
        );
    }
}

/// Validate that a lead's tag list behaves as a set
pub fn assert_lead_invariants(lead: &Lead) {
    let unique: HashSet<&str> = lead.tags.iter().map(String::as_str).collect();
    debug_assert!(
        unique.len() == lead.tags.len(),
        "Lead {} has duplicate tags: {:?}",
        lead.id,
        lead.tags
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventDraft, HOT_TAG};
    use crate::schedule::EventTimes;
    use chrono::{Duration, Utc};

    fn make_event() -> Event {
        let lead = Lead::new("1", "Page", Utc::now());
        let start = Utc::now();
        let times = EventTimes {
            start,
            end: start + Duration::hours(1),
        };
        EventDraft::new("Call", &lead, times).into_event(Uuid::new_v4())
    }

    #[test]
    fn test_valid_event() {
        assert_event_invariants(&make_event());
    }

    #[test]
    fn test_valid_event_list() {
        assert_event_list_invariants(&[make_event(), make_event()]);
    }

    #[test]
    fn test_valid_lead() {
        let lead = Lead::new("1", "Page", Utc::now()).with_tag("OTP").with_tag(HOT_TAG);
        assert_lead_invariants(&lead);
    }

    #[test]
    #[should_panic(expected = "not after its start")]
    fn test_zero_length_event() {
        let mut event = make_event();
        event.end_time = event.start_time;
        assert_event_invariants(&event);
    }

    #[test]
    #[should_panic(expected = "appears more than once")]
    fn test_duplicate_event_ids() {
        let event = make_event();
        assert_event_list_invariants(&[event.clone(), event]);
    }

    #[test]
    #[should_panic(expected = "duplicate tags")]
    fn test_duplicate_tags() {
        let mut lead = Lead::new("1", "Page", Utc::now());
        lead.tags = vec!["OTP".to_string(), "OTP".to_string()];
        assert_lead_invariants(&lead);
    }
}
