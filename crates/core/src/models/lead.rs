//! Lead model - a prospective customer on the sales desk

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::staleness;

/// Sentinel tag marking a lead for prioritized follow-up
pub const HOT_TAG: &str = "Lead hot";

/// A lead as supplied by the data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub sku: String,
    pub warehouse_link: String,
    pub source: String,
    /// Free-text purchase intention
    pub intention: String,
    pub customer_name: String,
    pub phone_number: String,
    /// Set semantics, kept in first-insertion order
    pub tags: Vec<String>,
    pub vehicle_description: String,
    pub last_edit_time: DateTime<Utc>,
}

impl Lead {
    pub fn new(id: impl Into<String>, customer_name: impl Into<String>, last_edit_time: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            sku: String::new(),
            warehouse_link: String::new(),
            source: String::new(),
            intention: String::new(),
            customer_name: customer_name.into(),
            phone_number: String::new(),
            tags: Vec::new(),
            vehicle_description: String::new(),
            last_edit_time,
        }
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = sku.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_intention(mut self, intention: impl Into<String>) -> Self {
        self.intention = intention.into();
        self
    }

    pub fn with_phone(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = phone_number.into();
        self
    }

    pub fn with_vehicle(mut self, vehicle_description: impl Into<String>) -> Self {
        self.vehicle_description = vehicle_description.into();
        self
    }

    pub fn with_warehouse_link(mut self, link: impl Into<String>) -> Self {
        self.warehouse_link = link.into();
        self
    }

    /// Add a tag, ignoring duplicates
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !self.has_tag(&tag) {
            self.tags.push(tag);
        }
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Hot status is carried by the sentinel tag
    pub fn is_hot(&self) -> bool {
        self.has_tag(HOT_TAG)
    }

    /// Tags shown in the table (sentinel excluded)
    pub fn display_tags(&self) -> impl Iterator<Item = &str> {
        self.tags
            .iter()
            .map(|t| t.as_str())
            .filter(|t| *t != HOT_TAG)
    }

    pub fn days_since_edit<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> i64 {
        staleness::days_since(self.last_edit_time, now)
    }

    /// Recomputed on every call; there is no stored flag.
    pub fn is_stale<Tz: TimeZone>(&self, now: &DateTime<Tz>, threshold_days: i64) -> bool {
        staleness::is_stale(self.last_edit_time, now, threshold_days)
    }

    /// Whole-record replacement with the hot sentinel flipped.
    ///
    /// Turning hot on moves the sentinel to the end of the tag list.
    pub fn with_hot_toggled(&self) -> Self {
        let was_hot = self.is_hot();
        let mut tags: Vec<String> = self.tags.iter().filter(|t| *t != HOT_TAG).cloned().collect();
        if !was_hot {
            tags.push(HOT_TAG.to_string());
        }
        Self {
            tags,
            ..self.clone()
        }
    }
}

/// Lead with its derived flags resolved against a point in time, for display
#[derive(Debug, Clone, Serialize)]
pub struct LeadRow {
    #[serde(flatten)]
    pub lead: Lead,
    pub days_since_edit: i64,
    pub is_stale: bool,
    pub is_hot: bool,
}

impl LeadRow {
    pub fn resolve<Tz: TimeZone>(lead: &Lead, now: &DateTime<Tz>, threshold_days: i64) -> Self {
        Self {
            days_since_edit: lead.days_since_edit(now),
            is_stale: lead.is_stale(now, threshold_days),
            is_hot: lead.is_hot(),
            lead: lead.clone(),
        }
    }
}
