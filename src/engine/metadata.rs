//! Provenance metadata columns

use crate::table::Table;
use crate::types::JsonValue;
use chrono::{DateTime, SecondsFormat, Utc};

/// Column holding the source name
pub const SOURCE_COLUMN: &str = "_viadot_source";

/// Column holding the UTC extraction timestamp
pub const DOWNLOADED_AT_COLUMN: &str = "_viadot_downloaded_at_utc";

/// Annotates a final table with provenance columns
pub trait MetadataInjector: Send + Sync {
    /// Add metadata columns to every row of `table`
    fn inject(&self, table: &mut Table, source_name: &str);
}

/// Adds [`SOURCE_COLUMN`] and [`DOWNLOADED_AT_COLUMN`] (RFC 3339)
#[derive(Debug, Clone, Default)]
pub struct IngestionMetadata {
    timestamp: Option<DateTime<Utc>>,
}

impl IngestionMetadata {
    /// Stamp rows with the time of injection
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp rows with a fixed time
    pub fn with_timestamp(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp: Some(timestamp),
        }
    }
}

impl MetadataInjector for IngestionMetadata {
    fn inject(&self, table: &mut Table, source_name: &str) {
        let timestamp = self.timestamp.unwrap_or_else(Utc::now);
        table.fill_column(SOURCE_COLUMN, JsonValue::String(source_name.to_string()));
        table.fill_column(
            DOWNLOADED_AT_COLUMN,
            JsonValue::String(timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)),
        );
    }
}
