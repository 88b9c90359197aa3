//! Event scheduling
//!
//! Composes calendar dates and wall-clock times into event instants, and
//! groups upcoming events into day buckets for the schedule view.

mod group;
mod time;

pub use group::*;
pub use time::*;
