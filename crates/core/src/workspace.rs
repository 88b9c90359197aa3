//! Session state for the desk
//!
//! The workspace owns the lead and event collections for one session. Every
//! mutation builds a new collection and swaps it in; the free functions below
//! are the pure replace-on-write steps and never touch their inputs.
//! Mutations addressed to an unknown id leave the collection as it was.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::error::Result;
use crate::filter::{filter_by_last_update, filter_leads, LeadFilter};
use crate::invariants::{assert_event_list_invariants, assert_lead_invariants};
use crate::models::{Event, EventDraft, EventPatch, Lead, LeadRow};
use crate::schedule::{events_for_lead, group_upcoming, DayBucket};

/// Append a new event built from `draft` under a fresh id
pub fn add_event(events: &[Event], draft: EventDraft) -> Result<(Vec<Event>, Event)> {
    draft.validate()?;
    let event = draft.into_event(Uuid::new_v4());
    let mut next = events.to_vec();
    next.push(event.clone());
    Ok((next, event))
}

/// Merge `patch` into the event with `id`.
///
/// A patch that would leave the event without a title or with its end at or
/// before its start is rejected.
pub fn update_event(events: &[Event], id: Uuid, patch: &EventPatch) -> Result<Vec<Event>> {
    events
        .iter()
        .map(|event| {
            if event.id != id {
                return Ok(event.clone());
            }
            let patched = event.patched(patch);
            patched.validate()?;
            Ok(patched)
        })
        .collect()
}

pub fn delete_event(events: &[Event], id: Uuid) -> Vec<Event> {
    events.iter().filter(|event| event.id != id).cloned().collect()
}

/// Flip the hot sentinel tag on one lead
pub fn toggle_hot_tag(leads: &[Lead], lead_id: &str) -> Vec<Lead> {
    leads
        .iter()
        .map(|lead| {
            if lead.id == lead_id {
                lead.with_hot_toggled()
            } else {
                lead.clone()
            }
        })
        .collect()
}

/// Application state for one session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workspace {
    leads: Vec<Lead>,
    events: Vec<Event>,
}

impl Workspace {
    pub fn new(leads: Vec<Lead>) -> Self {
        for lead in &leads {
            assert_lead_invariants(lead);
        }
        Self {
            leads,
            events: Vec::new(),
        }
    }

    pub fn with_events(mut self, events: Vec<Event>) -> Self {
        assert_event_list_invariants(&events);
        self.events = events;
        self
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn find_lead(&self, lead_id: &str) -> Option<&Lead> {
        self.leads.iter().find(|lead| lead.id == lead_id)
    }

    pub fn find_event(&self, id: Uuid) -> Option<&Event> {
        self.events.iter().find(|event| event.id == id)
    }

    /// Add an event and return it with its assigned id
    #[instrument(skip(self, draft), fields(lead_id = %draft.lead_id))]
    pub fn add_event(&mut self, draft: EventDraft) -> Result<Event> {
        let (events, event) = add_event(&self.events, draft)?;
        assert_event_list_invariants(&events);
        self.events = events;
        tracing::info!(event_id = %event.id, title = %event.title, "Event scheduled");
        Ok(event)
    }

    #[instrument(skip(self, patch))]
    pub fn update_event(&mut self, id: Uuid, patch: &EventPatch) -> Result<()> {
        if self.find_event(id).is_none() {
            tracing::debug!("Update for unknown event ignored");
            return Ok(());
        }
        if patch.is_empty() {
            tracing::debug!("Empty patch ignored");
            return Ok(());
        }
        let events = update_event(&self.events, id, patch)?;
        assert_event_list_invariants(&events);
        self.events = events;
        tracing::info!("Event updated");
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn delete_event(&mut self, id: Uuid) {
        let events = delete_event(&self.events, id);
        if events.len() == self.events.len() {
            tracing::debug!("Delete for unknown event ignored");
            return;
        }
        self.events = events;
        tracing::info!("Event deleted");
    }

    /// Flip the hot tag on a lead and return the new lead collection
    #[instrument(skip(self))]
    pub fn toggle_hot_tag(&mut self, lead_id: &str) -> &[Lead] {
        if self.find_lead(lead_id).is_none() {
            tracing::debug!("Hot toggle for unknown lead ignored");
            return &self.leads;
        }
        let leads = toggle_hot_tag(&self.leads, lead_id);
        for lead in &leads {
            assert_lead_invariants(lead);
        }
        self.leads = leads;
        &self.leads
    }

    pub fn filtered_leads<Tz: TimeZone>(&self, criteria: &LeadFilter, now: &DateTime<Tz>) -> Vec<Lead> {
        filter_leads(&self.leads, criteria, now)
    }

    /// Filtered leads with derived flags resolved, for the table
    pub fn lead_rows<Tz: TimeZone>(&self, criteria: &LeadFilter, now: &DateTime<Tz>) -> Vec<LeadRow> {
        self.filtered_leads(criteria, now)
            .iter()
            .map(|lead| LeadRow::resolve(lead, now, criteria.stale_threshold_days))
            .collect()
    }

    /// Leads with no edit in more than `days` days
    pub fn leads_untouched_for<Tz: TimeZone>(&self, days: i64, now: &DateTime<Tz>) -> Vec<Lead> {
        filter_by_last_update(&self.leads, days, now)
    }

    pub fn upcoming<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<DayBucket> {
        group_upcoming(&self.events, now)
    }

    pub fn events_for_lead(&self, lead_id: &str) -> Vec<Event> {
        events_for_lead(&self.events, lead_id)
    }

    /// Full session state as pretty JSON
    pub fn snapshot_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
