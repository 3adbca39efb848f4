//! Arrow schema inference and table to Arrow conversion
//!
//! Infers one Arrow type per table column and converts a `Table` to a
//! `RecordBatch` with fields in table column order.

use crate::error::{Error, Result};
use crate::table::Table;
use crate::types::JsonValue;
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, NullArray, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

/// Infer an Arrow schema for a table.
///
/// Every column becomes a nullable field. Nested values are stored as JSON
/// text, so the only types produced are Int64, Float64, Boolean, Utf8 and
/// Null (for columns with no non-null value).
pub fn infer_schema(table: &Table) -> Schema {
    let fields: Vec<Field> = table
        .columns()
        .iter()
        .map(|column| {
            let dtype = table
                .column_values(column)
                .into_iter()
                .map(infer_type)
                .fold(DataType::Null, |acc, t| merge_types(&acc, &t));
            Field::new(column, dtype, true)
        })
        .collect();

    Schema::new(fields)
}

/// Convert a table to an Arrow RecordBatch
pub fn table_to_arrow(table: &Table) -> Result<RecordBatch> {
    let schema = Arc::new(infer_schema(table));

    if table.is_empty() {
        return Ok(RecordBatch::new_empty(schema));
    }

    let columns: Vec<ArrayRef> = schema
        .fields()
        .iter()
        .map(|field| build_array(&table.column_values(field.name()), field.data_type()))
        .collect();

    RecordBatch::try_new(schema, columns)
        .map_err(|e| Error::output(format!("Failed to create RecordBatch: {e}")))
}

impl Table {
    /// Convert to an Arrow RecordBatch, see [`table_to_arrow`]
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        table_to_arrow(self)
    }
}

/// Infer Arrow DataType from a JSON value
fn infer_type(value: &JsonValue) -> DataType {
    match value {
        JsonValue::Null => DataType::Null,
        JsonValue::Bool(_) => DataType::Boolean,
        JsonValue::Number(n) => {
            if n.is_i64() {
                DataType::Int64
            } else {
                DataType::Float64
            }
        }
        JsonValue::String(_) | JsonValue::Array(_) | JsonValue::Object(_) => DataType::Utf8,
    }
}

/// Merge two data types into a compatible type
fn merge_types(type1: &DataType, type2: &DataType) -> DataType {
    match (type1, type2) {
        // Same types
        (a, b) if a == b => a.clone(),

        // Null can merge with anything
        (DataType::Null, other) | (other, DataType::Null) => other.clone(),

        // Numbers can merge (prefer Float64 for mixed)
        (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
            DataType::Float64
        }

        // Different types -> fall back to String (most flexible)
        _ => DataType::Utf8,
    }
}

/// Build an Arrow array from JSON values
fn build_array(values: &[&JsonValue], data_type: &DataType) -> ArrayRef {
    match data_type {
        DataType::Boolean => {
            let arr: BooleanArray = values.iter().map(|v| v.as_bool()).collect();
            Arc::new(arr)
        }

        DataType::Int64 => {
            let arr: Int64Array = values.iter().map(|v| v.as_i64()).collect();
            Arc::new(arr)
        }

        DataType::Float64 => {
            let arr: Float64Array = values.iter().map(|v| v.as_f64()).collect();
            Arc::new(arr)
        }

        DataType::Utf8 => {
            let arr: StringArray = values
                .iter()
                .map(|v| match v {
                    JsonValue::Null => None,
                    JsonValue::String(s) => Some(s.clone()),
                    other => Some(other.to_string()),
                })
                .collect();
            Arc::new(arr)
        }

        _ => Arc::new(NullArray::new(values.len())),
    }
}
