//! Interval partitioning module
//!
//! # Overview
//!
//! The API times out or truncates responses on wide date ranges, so an
//! overall `[from, to]` span is split into bounded sub-windows that are
//! queried one after another. Adjacent windows share their boundary date:
//! the upstream filter is inclusive on both ends, so boundary records may be
//! fetched twice and are removed later by the aggregator.

mod types;
mod windows;

pub use types::{parse_date, DateWindow, DATE_FLOOR};
pub use windows::partition;
