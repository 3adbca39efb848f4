//! Common types used throughout the extraction engine
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type, also used as a single table row
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Source (endpoint identifier)
// ============================================================================

/// The four endpoint families exposed by the datalake API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Jobs,
    Product,
    Company,
    Survey,
}

impl Source {
    /// Every supported source, in documentation order
    pub const ALL: [Source; 4] = [Source::Jobs, Source::Product, Source::Company, Source::Survey];

    /// Path segment appended to the base URL
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Jobs => "jobs",
            Source::Product => "product",
            Source::Company => "company",
            Source::Survey => "survey",
        }
    }

    /// Whether the endpoint accepts `from`/`to`/`limit` and pages its results.
    /// `survey` is a fixed-size dictionary returned in one call.
    pub fn is_date_filtered(&self) -> bool {
        !matches!(self, Source::Survey)
    }

    /// Whether each page arrives with rows and columns swapped
    pub fn is_transposed(&self) -> bool {
        matches!(self, Source::Product)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jobs" => Ok(Source::Jobs),
            "product" => Ok(Source::Product),
            "company" => Ok(Source::Company),
            "survey" => Ok(Source::Survey),
            _ => Err(Error::unsupported_endpoint(s)),
        }
    }
}

// ============================================================================
// Empty-result mode
// ============================================================================

/// What to do when an extraction legitimately yields zero rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IfEmpty {
    /// Return an error
    #[default]
    Fail,
    /// Return the empty table silently
    Skip,
    /// Return the empty table and emit a warning
    Warn,
}

impl fmt::Display for IfEmpty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IfEmpty::Fail => "fail",
            IfEmpty::Skip => "skip",
            IfEmpty::Warn => "warn",
        })
    }
}

impl FromStr for IfEmpty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(IfEmpty::Fail),
            "skip" => Ok(IfEmpty::Skip),
            "warn" => Ok(IfEmpty::Warn),
            other => Err(Error::validation(format!(
                "if_empty must be one of fail, skip, warn (got '{other}')"
            ))),
        }
    }
}

// ============================================================================
// Region
// ============================================================================

/// Region filter forwarded to the API.
///
/// Only `all` has an observable effect upstream today; region codes are
/// accepted and forwarded so callers keep working once the API honours them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Region {
    #[default]
    All,
    /// Two-letter region code, stored lowercase
    Code(String),
}

impl Region {
    /// Query parameter value
    pub fn as_str(&self) -> &str {
        match self {
            Region::All => "all",
            Region::Code(code) => code,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim().to_ascii_lowercase();
        if value == "all" {
            return Ok(Region::All);
        }
        if value.len() == 2 && value.chars().all(|c| c.is_ascii_alphabetic()) {
            return Ok(Region::Code(value));
        }
        Err(Error::validation(format!(
            "region must be 'all' or a two-letter region code (got '{s}')"
        )))
    }
}

impl TryFrom<String> for Region {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        region.as_str().to_string()
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}
