//! Application state management

use std::path::Path;

use chrono::{DateTime, FixedOffset, Local, Utc};
use leaddesk_core::{CrmConfig, Event, LeadFilter, Result, Workspace};

use crate::seed;

/// Main application state
pub struct AppState {
    pub config: CrmConfig,
    /// Zone used for calendar days and wall-clock times
    pub offset: FixedOffset,
    pub workspace: Workspace,
}

impl AppState {
    /// Load config and seed the session workspace
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => CrmConfig::load(path)?,
            None => CrmConfig::load_default()?,
        };
        let offset = match config.offset()? {
            Some(offset) => offset,
            None => *Local::now().offset(),
        };
        tracing::debug!(offset = %offset, "Using UTC offset");

        let now = Utc::now().with_timezone(&offset);
        let workspace = seed::demo_workspace(&now, &config)?;

        Ok(Self {
            config,
            offset,
            workspace,
        })
    }

    /// Wall-clock now in the desk's zone
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }

    /// Empty filter carrying the configured staleness threshold
    pub fn base_filter(&self) -> LeadFilter {
        LeadFilter::new().with_threshold(self.config.stale_threshold_days)
    }

    /// Earliest event of the lead that has not started yet
    pub fn next_event_for(&self, lead_id: &str) -> Option<Event> {
        let now = self.now();
        self.workspace
            .events_for_lead(lead_id)
            .into_iter()
            .filter(|event| event.start_time >= now)
            .min_by_key(|event| event.start_time)
    }
}
