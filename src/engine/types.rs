//! Engine types
//!
//! Request, result, message and statistics types for the extractor.

use crate::error::{Error, Result};
use crate::partition::{parse_date, DateWindow, DATE_FLOOR};
use crate::table::Table;
use crate::types::{IfEmpty, Region, Source};
use chrono::{NaiveDate, Utc};

// ============================================================================
// Messages
// ============================================================================

/// A message emitted during an extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Log level
    pub level: LogLevel,
    /// Message text
    pub text: String,
}

/// Log level for engine messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug information
    Debug,
    /// General information
    Info,
    /// Warning
    Warn,
}

impl Message {
    /// Create a message
    pub fn log(level: LogLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    /// Create an info message
    pub fn info(text: impl Into<String>) -> Self {
        Self::log(LogLevel::Info, text)
    }

    /// Create a debug message
    pub fn debug(text: impl Into<String>) -> Self {
        Self::log(LogLevel::Debug, text)
    }

    /// Create a warning message
    pub fn warn(text: impl Into<String>) -> Self {
        Self::log(LogLevel::Warn, text)
    }

    /// Check if this is a warning
    pub fn is_warning(&self) -> bool {
        self.level == LogLevel::Warn
    }
}

// ============================================================================
// Request
// ============================================================================

/// A validated extraction request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractRequest {
    /// Endpoint to extract
    pub source: Source,
    /// Overall date window, inclusive
    pub window: DateWindow,
    /// Page size sent as `limit`
    pub items_per_page: u32,
    /// Region filter
    pub region: Region,
    /// Behaviour on an empty result
    pub if_empty: IfEmpty,
    /// Sub-window size override; the extractor default applies when unset
    pub max_span_days: Option<u32>,
}

impl ExtractRequest {
    /// Default page size
    pub const DEFAULT_ITEMS_PER_PAGE: u32 = 100;

    /// Create a request with default paging, region and empty-result mode.
    ///
    /// A missing `to` means today (UTC).
    pub fn new(source: Source, from: NaiveDate, to: Option<NaiveDate>) -> Result<Self> {
        let to = to.unwrap_or_else(|| Utc::now().date_naive());
        let request = Self {
            source,
            window: DateWindow::new(from, to)?,
            items_per_page: Self::DEFAULT_ITEMS_PER_PAGE,
            region: Region::All,
            if_empty: IfEmpty::Fail,
            max_span_days: None,
        };
        request.validate()?;
        Ok(request)
    }

    /// Parse and validate a request from caller strings.
    ///
    /// Fails with a validation-class error (see [`Error::is_validation`])
    /// for an unknown source, malformed or out-of-range dates, a zero page
    /// size, a malformed region or an unknown empty-result mode.
    pub fn parse(
        source: &str,
        from_date: &str,
        to_date: Option<&str>,
        items_per_page: u32,
        region: &str,
        if_empty: &str,
    ) -> Result<Self> {
        let source: Source = source.parse()?;
        let from = parse_date("from_date", from_date)?;
        let to = to_date.map(|d| parse_date("to_date", d)).transpose()?;

        let request = Self::new(source, from, to)?
            .with_items_per_page(items_per_page)
            .with_region(region.parse()?)
            .with_if_empty(if_empty.parse()?);
        request.validate()?;
        Ok(request)
    }

    /// Set the page size
    #[must_use]
    pub fn with_items_per_page(mut self, items_per_page: u32) -> Self {
        self.items_per_page = items_per_page;
        self
    }

    /// Set the region
    #[must_use]
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    /// Set the empty-result mode
    #[must_use]
    pub fn with_if_empty(mut self, if_empty: IfEmpty) -> Self {
        self.if_empty = if_empty;
        self
    }

    /// Override the sub-window size
    #[must_use]
    pub fn with_max_span_days(mut self, days: u32) -> Self {
        self.max_span_days = Some(days);
        self
    }

    /// Check the request invariants
    pub fn validate(&self) -> Result<()> {
        if self.window.from < DATE_FLOOR {
            return Err(Error::validation(format!(
                "from_date {} is earlier than {DATE_FLOOR}, the first date the API serves",
                self.window.from
            )));
        }
        if self.window.to < self.window.from {
            return Err(Error::invalid_range(self.window.from, self.window.to));
        }
        if self.items_per_page == 0 {
            return Err(Error::validation("items_per_page must be at least 1"));
        }
        if self.max_span_days == Some(0) {
            return Err(Error::validation("max_span_days must be at least 1"));
        }
        Ok(())
    }
}

// ============================================================================
// Result
// ============================================================================

/// Statistics from an extraction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractStats {
    /// Date sub-windows walked
    pub windows: usize,
    /// Requests sent
    pub pages_fetched: usize,
    /// Rows decoded before deduplication
    pub rows_fetched: usize,
    /// Rows dropped as exact duplicates
    pub duplicates_removed: usize,
    /// Rows in the final table
    pub rows: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl ExtractStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a walked window
    pub fn add_window(&mut self, pages: usize, rows: usize) {
        self.windows += 1;
        self.pages_fetched += pages;
        self.rows_fetched += rows;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

/// Outcome of a successful extraction
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Final table, with metadata columns when non-empty
    pub table: Table,
    /// Run statistics
    pub stats: ExtractStats,
    /// Messages emitted during the run
    pub messages: Vec<Message>,
}

impl Extraction {
    /// Warnings among the messages
    pub fn warnings(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.is_warning())
    }
}
