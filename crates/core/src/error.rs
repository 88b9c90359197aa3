//! Error types for LeadDesk Core

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Event must end after it starts (start {start}, end {end})")]
    InvalidSpan {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
