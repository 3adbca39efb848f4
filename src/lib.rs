// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Vid Club extraction engine
//!
//! Extracts tabular records from the date-filtered, paginated Vid Club
//! datalake API and assembles them into one deduplicated table.
//!
//! ## Features
//!
//! - **Date Partitioning**: Wide date ranges are split into bounded windows
//! - **Pagination Detection**: Page-number, cursor and unpaginated responses
//!   are told apart from the first response of every walk
//! - **Deduplication**: Rows fetched twice on shared window boundaries are
//!   dropped, keeping the first occurrence
//! - **Empty-Result Policy**: Fail, skip or warn on an empty result
//! - **Arrow Output**: Tables convert to Arrow RecordBatches and Parquet
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vidclub_extract::{ExtractRequest, Extractor, ExtractorConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ExtractorConfig::from_file("vidclub.yaml")?;
//!     let extractor = Extractor::new(&config)?;
//!
//!     let request = extractor.request("jobs", "2023-01-01", Some("2023-03-31"))?;
//!     let extraction = extractor.extract(&request).await?;
//!
//!     println!("{} rows", extraction.table.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                Extractor::extract(ExtractRequest)                │
//! └──────────────────────────────────────────────────────────────────┘
//!                                 │
//! ┌───────────┬───────────┬───────┴───────┬────────────┬────────────┐
//! │ Partition │   Query   │   Paginate    │  Aggregate │   Policy   │
//! ├───────────┼───────────┼───────────────┼────────────┼────────────┤
//! │ Windows   │ Filters   │ Page number   │ Concat     │ Fail       │
//! │ Floor     │ Cursor    │ Cursor        │ Dedup      │ Skip       │
//! │ Shared    │ Next URL  │ None          │ Union cols │ Warn       │
//! │ bounds    │ Survey    │ Transpose     │            │ Metadata   │
//! └───────────┴───────────┴───────────────┴────────────┴────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the extraction engine
pub mod error;

/// Common types and type aliases
pub mod types;

/// API credentials
pub mod auth;

/// Transport seam and HTTP client with retry and rate limiting
pub mod http;

/// Request descriptors
pub mod query;

/// Date window partitioning
pub mod partition;

/// Payload decoding into batches
pub mod decode;

/// Pagination detection and traversal
pub mod pagination;

/// Result aggregation and deduplication
pub mod table;

/// Empty-result policy
pub mod policy;

/// Extraction facade
pub mod engine;

/// Extractor configuration
pub mod config;

/// Arrow/Parquet output
pub mod output;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use auth::Credentials;
pub use config::ExtractorConfig;
pub use engine::{ExtractRequest, Extraction, Extractor};
pub use table::Table;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
