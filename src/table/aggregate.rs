//! Window and cross-window aggregation

use super::types::Table;
use crate::decode::Batch;
use crate::types::{JsonObject, JsonValue};
use std::collections::HashSet;
use std::fmt::Write;
use tracing::debug;

/// Concatenate the batches of one window in encounter order
pub fn concat_batches(batches: Vec<Batch>) -> Table {
    let mut table = Table::new();
    for batch in batches {
        table.extend_batch(batch);
    }
    table
}

/// Remove rows equal to an earlier row, keeping first occurrences.
///
/// Rows compare over every table column, with absent and `null` equal.
/// Returns the number of rows removed.
pub fn dedup(table: &mut Table) -> usize {
    let columns = table.columns().to_vec();
    let before = table.len();
    let mut seen = HashSet::with_capacity(before);

    table.retain_rows(|row| seen.insert(row_key(&columns, row)));

    before - table.len()
}

/// Final table of an aggregation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregated {
    /// Deduplicated table
    pub table: Table,
    /// Rows dropped as exact duplicates
    pub duplicates_removed: usize,
}

/// Collects per-window tables in partition order
#[derive(Debug, Default)]
pub struct Aggregator {
    table: Table,
    windows: usize,
}

impl Aggregator {
    /// Create an empty aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the batches of the next window
    pub fn push_window(&mut self, batches: Vec<Batch>) {
        let window = concat_batches(batches);
        debug!("Window {} contributed {} rows", self.windows, window.len());
        self.table.append(window);
        self.windows += 1;
    }

    /// Number of windows pushed so far
    pub fn windows(&self) -> usize {
        self.windows
    }

    /// Deduplicate and return the final table
    pub fn finish(mut self) -> Aggregated {
        let duplicates_removed = dedup(&mut self.table);
        if duplicates_removed > 0 {
            debug!(
                "Removed {} duplicate rows across {} windows",
                duplicates_removed, self.windows
            );
        }
        Aggregated {
            table: self.table,
            duplicates_removed,
        }
    }
}

fn row_key(columns: &[String], row: &JsonObject) -> String {
    let mut key = String::new();
    for column in columns {
        write_canonical(&mut key, row.get(column).unwrap_or(&JsonValue::Null));
        key.push('\u{1f}');
    }
    key
}

/// Largest float below which every integral value is exact
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Serialize with object keys sorted so equal values give equal keys.
/// Integral floats are written as integers, so `1` and `1.0` collide.
#[allow(clippy::float_cmp)]
fn write_canonical(out: &mut String, value: &JsonValue) {
    match value {
        JsonValue::Number(n) => match n.as_f64() {
            Some(f) if f.trunc() == f && f.abs() < MAX_EXACT_INTEGER => {
                let _ = write!(out, "{}", f as i64);
            }
            _ => {
                let _ = write!(out, "{n}");
            }
        },
        JsonValue::Object(obj) => {
            let mut entries: Vec<(&String, &JsonValue)> = obj.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (key, inner) in entries {
                let _ = write!(out, "{key:?}:");
                write_canonical(out, inner);
                out.push(',');
            }
            out.push('}');
        }
        JsonValue::Array(items) => {
            out.push('[');
            for item in items {
                write_canonical(out, item);
                out.push(',');
            }
            out.push(']');
        }
        scalar => {
            let _ = write!(out, "{scalar}");
        }
    }
}
