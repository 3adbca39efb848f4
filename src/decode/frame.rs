//! Payload to batch decoding

use super::types::Batch;
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};

/// Decode a JSON payload into a batch.
///
/// - `null` decodes to an empty batch
/// - a list yields one row per element; objects keep their keys, lists and
///   scalars get positional column names (`"0"`, `"1"`, ...)
/// - a mapping is read column-wise: object values are `{label: value}`
///   columns, list values are positional columns, and scalar values are
///   broadcast to every row
/// - any other scalar is not a table and fails with `Decode`
pub fn decode_frame(payload: &JsonValue) -> Result<Batch> {
    match payload {
        JsonValue::Null => Ok(Batch::new()),
        JsonValue::Array(items) => Ok(decode_records(items)),
        JsonValue::Object(columns) => decode_columns(columns),
        other => Err(Error::decode(format!(
            "expected a list or mapping of records, got {}",
            kind_of(other)
        ))),
    }
}

fn decode_records(items: &[JsonValue]) -> Batch {
    let mut batch = Batch::new();

    for (position, item) in items.iter().enumerate() {
        let row = match item {
            JsonValue::Object(obj) => obj.clone(),
            JsonValue::Array(values) => values
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v.clone()))
                .collect(),
            scalar => {
                let mut row = JsonObject::new();
                row.insert("0".to_string(), scalar.clone());
                row
            }
        };
        batch.push_row(position.to_string(), row);
    }

    batch
}

fn decode_columns(columns: &JsonObject) -> Result<Batch> {
    let has_nested = columns.values().any(JsonValue::is_object);
    let has_lists = columns.values().any(JsonValue::is_array);

    if has_nested && has_lists {
        return Err(Error::decode(
            "cannot mix mapping and list columns in one payload",
        ));
    }

    let labels: Vec<String> = if has_nested {
        let mut labels: Vec<String> = Vec::new();
        for inner in columns.values().filter_map(JsonValue::as_object) {
            for key in inner.keys() {
                if !labels.contains(key) {
                    labels.push(key.clone());
                }
            }
        }
        labels
    } else if has_lists {
        let len = columns
            .values()
            .filter_map(JsonValue::as_array)
            .map(Vec::len)
            .max()
            .unwrap_or(0);
        (0..len).map(|i| i.to_string()).collect()
    } else if columns.is_empty() {
        Vec::new()
    } else {
        vec!["0".to_string()]
    };

    let mut batch = Batch::new();
    for name in columns.keys() {
        batch.add_column(name);
    }
    for (position, label) in labels.iter().enumerate() {
        let mut row = JsonObject::new();
        for (name, column) in columns {
            let cell = match column {
                JsonValue::Object(inner) => inner.get(label).cloned(),
                JsonValue::Array(values) => Some(values.get(position).cloned().unwrap_or_default()),
                scalar => Some(scalar.clone()),
            };
            if let Some(cell) = cell {
                row.insert(name.clone(), cell);
            }
        }
        batch.push_row(label.clone(), row);
    }

    Ok(batch)
}

fn kind_of(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "a list",
        JsonValue::Object(_) => "a mapping",
    }
}
