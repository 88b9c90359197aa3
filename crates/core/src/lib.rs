//! LeadDesk Core Library
//!
//! Lead models, staleness, lead filtering, event scheduling, and the
//! in-memory session workspace for the LeadDesk CRM.

pub mod config;
pub mod error;
pub mod filter;
pub mod invariants;
pub mod models;
pub mod schedule;
pub mod staleness;
pub mod workspace;

pub use config::CrmConfig;
pub use error::{Error, Result};
pub use filter::{
    all_tags, filter_by_last_update, filter_leads, unique_sources, LeadFilter, SourceFilter,
    StatusFilter,
};
pub use models::*;
pub use schedule::*;
pub use staleness::{days_since, is_stale, DEFAULT_STALE_THRESHOLD_DAYS};
pub use workspace::Workspace;
