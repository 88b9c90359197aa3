//! Desk configuration
//!
//! Loaded from `leaddesk.toml` in the platform config directory, or from an
//! explicit path. Every field has a default, so a missing file or a partial
//! file is fine.

use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{Error, Result};
use crate::models::DEFAULT_REMINDER_MINUTES;
use crate::schedule::{parse_clock_part, DEFAULT_EVENT_MINUTES};
use crate::staleness::DEFAULT_STALE_THRESHOLD_DAYS;

/// Config file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "leaddesk.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrmConfig {
    /// Days without an edit before a lead is stale
    pub stale_threshold_days: i64,
    /// Length of an event booked without an explicit end
    pub default_event_minutes: i64,
    /// Reminder lead time for new events
    pub reminder_offset_minutes: u32,
    /// Fixed UTC offset such as `+07:00`; host local offset when unset
    pub utc_offset: Option<String>,
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            stale_threshold_days: DEFAULT_STALE_THRESHOLD_DAYS,
            default_event_minutes: DEFAULT_EVENT_MINUTES,
            reminder_offset_minutes: DEFAULT_REMINDER_MINUTES,
            utc_offset: None,
        }
    }
}

impl CrmConfig {
    /// `<config dir>/leaddesk.toml`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "onyx", "leaddesk").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Parse and validate TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: CrmConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`; a missing file yields the defaults
    #[instrument(skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        tracing::info!(
            stale_threshold_days = config.stale_threshold_days,
            default_event_minutes = config.default_event_minutes,
            "Loaded config"
        );
        Ok(config)
    }

    /// Load from the platform default location
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => {
                tracing::warn!("Could not determine config directory, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Configured offset, if any
    pub fn offset(&self) -> Result<Option<FixedOffset>> {
        self.utc_offset.as_deref().map(parse_offset).transpose()
    }

    fn validate(&self) -> Result<()> {
        if self.stale_threshold_days < 0 {
            return Err(Error::Validation(format!(
                "stale_threshold_days must not be negative, got {}",
                self.stale_threshold_days
            )));
        }
        if self.default_event_minutes <= 0 {
            return Err(Error::Validation(format!(
                "default_event_minutes must be positive, got {}",
                self.default_event_minutes
            )));
        }
        self.offset()?;
        Ok(())
    }
}

/// Parse `+HH:MM` / `-HH:MM` (`Z` for UTC)
fn parse_offset(value: &str) -> Result<FixedOffset> {
    let invalid = || Error::Validation(format!("utc_offset '{}' is not in +HH:MM form", value));
    let value = value.trim();
    if value.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = if let Some(rest) = value.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = value.strip_prefix('-') {
        (-1, rest)
    } else {
        return Err(invalid());
    };
    let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
    let hours = parse_clock_part(hours).ok_or_else(invalid)?;
    let minutes = parse_clock_part(minutes).ok_or_else(invalid)?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    // Bounded above, fits in i32
    let seconds = (hours * 3600 + minutes * 60) as i32;
    FixedOffset::east_opt(sign * seconds).ok_or_else(invalid)
}
