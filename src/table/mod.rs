//! Result aggregation module
//!
//! Concatenates the batches of each date window, then the windows in
//! partition order, and removes exact duplicate rows. Adjacent windows share
//! their boundary date, so records on that date arrive twice and are dropped
//! here.

mod aggregate;
mod types;

pub use aggregate::{concat_batches, dedup, Aggregated, Aggregator};
pub use types::Table;
