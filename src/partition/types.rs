//! Date window types

use crate::error::{Error, Result};
use chrono::NaiveDate;
use std::fmt;

/// Earliest date the API holds data for
pub const DATE_FLOOR: NaiveDate = match NaiveDate::from_ymd_opt(2022, 3, 22) {
    Some(date) => date,
    None => panic!("invalid date floor"),
};

/// An inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateWindow {
    /// First day
    pub from: NaiveDate,
    /// Last day
    pub to: NaiveDate,
}

impl DateWindow {
    /// Create a window, failing with `InvalidDateRange` when `to < from`
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        if to < from {
            return Err(Error::invalid_range(from, to));
        }
        Ok(Self { from, to })
    }

    /// Number of days between the bounds (0 for a single-day window)
    pub fn span_days(&self) -> i64 {
        (self.to - self.from).num_days()
    }

    /// Check if a date falls inside the window
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.from, self.to)
    }
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        Error::validation(format!("{field} must be a YYYY-MM-DD date (got '{value}'): {e}"))
    })
}
