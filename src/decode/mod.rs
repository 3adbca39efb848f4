//! Response decoder module
//!
//! # Overview
//!
//! Turns a JSON payload into a `Batch` of rows. The API mixes record-oriented
//! lists with column-oriented mappings (`{column: {label: value}}` and
//! `{column: [values]}`), and the `product` endpoint sends its pages with rows
//! and columns swapped, so every batch keeps its row labels to allow
//! transposition.

mod frame;
mod types;

pub use frame::decode_frame;
pub use types::Batch;
