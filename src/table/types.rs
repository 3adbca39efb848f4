//! Table type

use crate::decode::Batch;
use crate::types::{JsonObject, JsonValue};

static NULL: JsonValue = JsonValue::Null;

/// Ordered, column-named extraction result.
///
/// Rows are sparse mappings; a column absent from a row reads as `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<JsonObject>,
}

impl Table {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table with the given columns
    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for column in columns {
            table.add_column(column.into());
        }
        table
    }

    /// Register a column if it is not known yet
    pub fn add_column(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.columns.contains(&name) {
            self.columns.push(name);
        }
    }

    /// Append a row, registering any new columns
    pub fn push_row(&mut self, row: JsonObject) {
        for key in row.keys() {
            if !self.columns.contains(key) {
                self.columns.push(key.clone());
            }
        }
        self.rows.push(row);
    }

    /// Append the rows of a batch, extending the column union
    pub fn extend_batch(&mut self, batch: Batch) {
        let (columns, rows) = batch.into_parts();
        for column in columns {
            self.add_column(column);
        }
        self.rows.extend(rows);
    }

    /// Append another table, extending the column union
    pub fn append(&mut self, other: Table) {
        for column in other.columns {
            self.add_column(column);
        }
        self.rows.extend(other.rows);
    }

    /// Set `column` to `value` on every row, adding the column when missing
    pub fn fill_column(&mut self, column: &str, value: JsonValue) {
        self.add_column(column);
        for row in &mut self.rows {
            row.insert(column.to_string(), value.clone());
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in first-seen order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Raw rows
    pub fn rows(&self) -> &[JsonObject] {
        &self.rows
    }

    /// Value at a row and column; `null` when the row lacks the column
    pub fn value(&self, row: usize, column: &str) -> &JsonValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&NULL)
    }

    /// All values of one column, `null` where absent
    pub fn column_values(&self, column: &str) -> Vec<&JsonValue> {
        self.rows
            .iter()
            .map(|r| r.get(column).unwrap_or(&NULL))
            .collect()
    }

    /// Dense rows as JSON objects, every column present in table order
    pub fn to_records(&self) -> Vec<JsonValue> {
        self.rows
            .iter()
            .map(|row| {
                let dense: JsonObject = self
                    .columns
                    .iter()
                    .map(|c| (c.clone(), row.get(c).cloned().unwrap_or_default()))
                    .collect();
                JsonValue::Object(dense)
            })
            .collect()
    }

    pub(crate) fn retain_rows(&mut self, mut keep: impl FnMut(&JsonObject) -> bool) {
        self.rows.retain(|row| keep(row));
    }
}

impl From<Batch> for Table {
    fn from(batch: Batch) -> Self {
        let mut table = Self::new();
        table.extend_batch(batch);
        table
    }
}
