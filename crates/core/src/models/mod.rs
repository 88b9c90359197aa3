//! Data models for LeadDesk

mod event;
mod lead;

pub use event::*;
pub use lead::*;
