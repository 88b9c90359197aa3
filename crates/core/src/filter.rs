//! Lead filter engine
//!
//! Every criterion is an independent predicate; a lead is kept only when all
//! of them accept it. Output keeps input order.

use std::collections::HashSet;
use std::str::FromStr;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Lead, HOT_TAG};
use crate::staleness::{self, DEFAULT_STALE_THRESHOLD_DAYS};

/// Staleness criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Stale,
    Fresh,
}

impl StatusFilter {
    pub fn accepts(&self, is_stale: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Stale => is_stale,
            StatusFilter::Fresh => !is_stale,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "stale" => Ok(StatusFilter::Stale),
            "fresh" => Ok(StatusFilter::Fresh),
            other => Err(Error::Validation(format!(
                "unknown status '{}', expected all, stale or fresh",
                other
            ))),
        }
    }
}

/// Source criterion
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SourceFilter {
    #[default]
    All,
    Only(String),
}

impl SourceFilter {
    pub fn accepts(&self, source: &str) -> bool {
        match self {
            SourceFilter::All => true,
            SourceFilter::Only(wanted) => wanted == source,
        }
    }
}

impl From<&str> for SourceFilter {
    /// `"all"` selects every source
    fn from(value: &str) -> Self {
        if value == "all" {
            SourceFilter::All
        } else {
            SourceFilter::Only(value.to_string())
        }
    }
}

/// Filter criteria for the lead table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadFilter {
    /// Case-insensitive substring; blank matches everything
    pub search: String,
    pub status: StatusFilter,
    pub source: SourceFilter,
    /// Lead must carry every listed tag
    pub tags: Vec<String>,
    /// Only leads with no edit in more than this many days
    pub untouched_days: Option<i64>,
    pub stale_threshold_days: i64,
}

impl Default for LeadFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: StatusFilter::All,
            source: SourceFilter::All,
            tags: Vec::new(),
            untouched_days: None,
            stale_threshold_days: DEFAULT_STALE_THRESHOLD_DAYS,
        }
    }
}

impl LeadFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_source(mut self, source: SourceFilter) -> Self {
        self.source = source;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    pub fn with_untouched_days(mut self, days: i64) -> Self {
        self.untouched_days = Some(days);
        self
    }

    pub fn with_threshold(mut self, days: i64) -> Self {
        self.stale_threshold_days = days;
        self
    }

    /// Select the tag if it is not selected yet, otherwise deselect it
    pub fn toggle_tag(&mut self, tag: &str) {
        if let Some(pos) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(pos);
        } else {
            self.tags.push(tag.to_string());
        }
    }

    pub fn clear_tags(&mut self) {
        self.tags.clear();
    }

    /// True when at least one criterion narrows the result
    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty()
            || self.status != StatusFilter::All
            || self.source != SourceFilter::All
            || !self.tags.is_empty()
            || self.untouched_days.is_some()
    }

    pub fn matches<Tz: TimeZone>(&self, lead: &Lead, now: &DateTime<Tz>) -> bool {
        self.matches_search(lead)
            && self
                .status
                .accepts(lead.is_stale(now, self.stale_threshold_days))
            && self.source.accepts(&lead.source)
            && self.tags.iter().all(|tag| lead.has_tag(tag))
            && self
                .untouched_days
                .map_or(true, |days| untouched_for(lead, days, now))
    }

    fn matches_search(&self, lead: &Lead) -> bool {
        let term = self.search.trim();
        if term.is_empty() {
            return true;
        }
        let needle = term.to_lowercase();
        [
            &lead.customer_name,
            &lead.phone_number,
            &lead.sku,
            &lead.source,
            &lead.intention,
            &lead.vehicle_description,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Leads satisfying every criterion, in input order
pub fn filter_leads<Tz: TimeZone>(leads: &[Lead], criteria: &LeadFilter, now: &DateTime<Tz>) -> Vec<Lead> {
    leads
        .iter()
        .filter(|lead| criteria.matches(lead, now))
        .cloned()
        .collect()
}

/// Leads not updated in strictly more than `days` days
pub fn filter_by_last_update<Tz: TimeZone>(leads: &[Lead], days: i64, now: &DateTime<Tz>) -> Vec<Lead> {
    leads
        .iter()
        .filter(|lead| untouched_for(lead, days, now))
        .cloned()
        .collect()
}

fn untouched_for<Tz: TimeZone>(lead: &Lead, days: i64, now: &DateTime<Tz>) -> bool {
    staleness::days_since(lead.last_edit_time, now) > days
}

/// Distinct tags in first-seen order, hot sentinel excluded
pub fn all_tags(leads: &[Lead]) -> Vec<String> {
    let mut seen = HashSet::new();
    leads
        .iter()
        .flat_map(|lead| lead.tags.iter())
        .filter(|tag| tag.as_str() != HOT_TAG)
        .filter(|tag| seen.insert(tag.as_str()))
        .cloned()
        .collect()
}

/// Distinct sources in first-seen order
pub fn unique_sources(leads: &[Lead]) -> Vec<String> {
    let mut seen = HashSet::new();
    leads
        .iter()
        .map(|lead| lead.source.as_str())
        .filter(|source| seen.insert(*source))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    fn sample_leads() -> Vec<Lead> {
        vec![
            Lead::new("1", "Page", now() - Duration::days(5))
                .with_sku("SKU-476396")
                .with_source("Website")
                .with_phone("097****977")
                .with_vehicle("Toyota Camry 2.5")
                .with_tag("OTP")
                .with_tag("Returning customer")
                .with_tag(HOT_TAG),
            Lead::new("2", "Huynh Xuan Phong", now() - Duration::days(1))
                .with_sku("SKU-162351")
                .with_source("Referral")
                .with_vehicle("Honda Civic 1.5")
                .with_tag("OTP")
                .with_tag("Inspected"),
            Lead::new("3", "Le Minh Tuan", now() - Duration::days(2))
                .with_sku("SKU-438901")
                .with_source("Website")
                .with_intention("First time buyer - needs financing")
                .with_vehicle("Hyundai Accent")
                .with_tag("OTP"),
        ]
    }

    fn ids(leads: &[Lead]) -> Vec<&str> {
        leads.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn test_default_filter_keeps_everything() {
        let leads = sample_leads();
        let filter = LeadFilter::new();
        assert!(!filter.is_active());
        assert_eq!(filter_leads(&leads, &filter, &now()), leads);
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let leads = sample_leads();
        let by_vehicle = LeadFilter::new().with_search("CIVIC");
        assert_eq!(ids(&filter_leads(&leads, &by_vehicle, &now())), vec!["2"]);

        let by_intention = LeadFilter::new().with_search("financing");
        assert_eq!(ids(&filter_leads(&leads, &by_intention, &now())), vec!["3"]);

        let by_phone = LeadFilter::new().with_search("****977");
        assert_eq!(ids(&filter_leads(&leads, &by_phone, &now())), vec!["1"]);

        let blank = LeadFilter::new().with_search("   ");
        assert_eq!(filter_leads(&leads, &blank, &now()).len(), 3);
    }

    #[test]
    fn test_status_filter() {
        let leads = sample_leads();
        let stale = LeadFilter::new().with_status(StatusFilter::Stale);
        assert_eq!(ids(&filter_leads(&leads, &stale, &now())), vec!["1"]);

        let fresh = LeadFilter::new().with_status(StatusFilter::Fresh);
        assert_eq!(ids(&filter_leads(&leads, &fresh, &now())), vec!["2", "3"]);

        let strict = fresh.with_threshold(1);
        assert_eq!(ids(&filter_leads(&leads, &strict, &now())), vec!["2"]);
    }

    #[test]
    fn test_source_filter_is_exact() {
        let leads = sample_leads();
        let filter = LeadFilter::new().with_source(SourceFilter::from("Website"));
        assert_eq!(ids(&filter_leads(&leads, &filter, &now())), vec!["1", "3"]);

        let partial = LeadFilter::new().with_source(SourceFilter::from("Web"));
        assert!(filter_leads(&leads, &partial, &now()).is_empty());

        assert_eq!(SourceFilter::from("all"), SourceFilter::All);
    }

    #[test]
    fn test_tags_require_all() {
        let leads = sample_leads();
        let filter = LeadFilter::new().with_tag("OTP").with_tag("Inspected");
        assert_eq!(ids(&filter_leads(&leads, &filter, &now())), vec!["2"]);

        let hot = LeadFilter::new().with_tag(HOT_TAG);
        assert_eq!(ids(&filter_leads(&leads, &hot, &now())), vec!["1"]);
    }

    #[test]
    fn test_criteria_combine_and_filter_is_idempotent() {
        let leads = sample_leads();
        let filter = LeadFilter::new()
            .with_source(SourceFilter::from("Website"))
            .with_status(StatusFilter::Fresh)
            .with_tag("OTP");

        let once = filter_leads(&leads, &filter, &now());
        assert_eq!(ids(&once), vec!["3"]);
        assert_eq!(filter_leads(&once, &filter, &now()), once);
    }

    #[test]
    fn test_toggle_tag() {
        let mut filter = LeadFilter::new();
        filter.toggle_tag("OTP");
        filter.toggle_tag("Inspected");
        assert_eq!(filter.tags, vec!["OTP", "Inspected"]);
        assert!(filter.is_active());

        filter.toggle_tag("OTP");
        assert_eq!(filter.tags, vec!["Inspected"]);

        filter.clear_tags();
        assert!(!filter.is_active());
    }

    #[test]
    fn test_filter_by_last_update() {
        let leads = vec![
            Lead::new("old", "A", now() - Duration::days(5)),
            Lead::new("new", "B", now() - Duration::days(1)),
        ];
        assert_eq!(ids(&filter_by_last_update(&leads, 3, &now())), vec!["old"]);
        assert_eq!(filter_by_last_update(&leads, 0, &now()).len(), 2);
        assert!(filter_by_last_update(&leads, 5, &now()).is_empty());
    }

    #[test]
    fn test_untouched_days_combines_with_other_criteria() {
        let leads = sample_leads();
        let filter = LeadFilter::new().with_untouched_days(1);
        assert!(filter.is_active());
        assert_eq!(ids(&filter_leads(&leads, &filter, &now())), vec!["1", "3"]);

        let website = LeadFilter::new().with_source(SourceFilter::from("Website"));
        let combined = website.clone().with_untouched_days(1);
        let chained = filter_by_last_update(&filter_leads(&leads, &website, &now()), 1, &now());
        assert_eq!(filter_leads(&leads, &combined, &now()), chained);

        let fresh = filter.with_status(StatusFilter::Fresh);
        assert_eq!(ids(&filter_leads(&leads, &fresh, &now())), vec!["3"]);
    }

    #[test]
    fn test_all_tags_excludes_sentinel_and_duplicates() {
        let tags = all_tags(&sample_leads());
        assert_eq!(tags, vec!["OTP", "Returning customer", "Inspected"]);
        assert!(!tags.iter().any(|t| t == HOT_TAG));
    }

    #[test]
    fn test_unique_sources() {
        assert_eq!(unique_sources(&sample_leads()), vec!["Website", "Referral"]);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Stale".parse::<StatusFilter>().unwrap(), StatusFilter::Stale);
        assert!("old".parse::<StatusFilter>().is_err());
    }
}
