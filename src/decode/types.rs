//! Batch type

use crate::types::{JsonObject, JsonValue};

/// Decoded rows of a single page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    /// Column names in first-seen order
    columns: Vec<String>,
    /// Row labels (positions or mapping keys), parallel to `rows`
    labels: Vec<String>,
    /// Row values keyed by column; missing keys are absent values
    rows: Vec<JsonObject>,
}

impl Batch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a column that may have no values yet
    pub fn add_column(&mut self, name: &str) {
        if !self.columns.iter().any(|c| c == name) {
            self.columns.push(name.to_string());
        }
    }

    /// Append a labelled row, registering any new columns
    pub fn push_row(&mut self, label: impl Into<String>, row: JsonObject) {
        for key in row.keys() {
            self.add_column(key);
        }
        self.labels.push(label.into());
        self.rows.push(row);
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the batch has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Row labels
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Rows
    pub fn rows(&self) -> &[JsonObject] {
        &self.rows
    }

    /// Consume the batch, returning its columns and rows
    pub fn into_parts(self) -> (Vec<String>, Vec<JsonObject>) {
        (self.columns, self.rows)
    }

    /// Swap rows and columns.
    ///
    /// Each column becomes a row labelled with the column name, and each row
    /// label becomes a column. Absent cells stay absent.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut transposed = Self::new();
        transposed.columns = self.labels.clone();

        for column in &self.columns {
            let mut row = JsonObject::new();
            for (label, source) in self.labels.iter().zip(&self.rows) {
                if let Some(value) = source.get(column) {
                    row.insert(label.clone(), value.clone());
                }
            }
            transposed.labels.push(column.clone());
            transposed.rows.push(row);
        }

        transposed
    }

    /// Value at a row and column, if present
    pub fn get(&self, row: usize, column: &str) -> Option<&JsonValue> {
        self.rows.get(row).and_then(|r| r.get(column))
    }
}
