//! Output module
//!
//! Handles Arrow RecordBatch creation and local file writing.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Inferring Arrow schemas from extracted tables
//! - Converting tables to Arrow RecordBatches
//! - Writing Parquet files and JSON lines

mod schema;
mod writer;

pub use schema::{infer_schema, table_to_arrow};
pub use writer::{write_json, write_json_file, write_parquet, ParquetWriterConfig};
