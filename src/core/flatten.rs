use std::collections::HashMap;

use serde_json::Value;

use crate::domain::model::{Scalar, Table};

/// Builds a [`Table`] from a decoded JSON payload. `None`, `null` and empty
/// arrays produce an empty table. An array of objects produces one row per
/// element in order; a bare object produces a single row. Columns are the
/// union of flattened keys across all rows, in first-seen order; fields a row
/// lacks become `Null`. Non-object array elements are skipped.
pub fn table_from_json(value: Option<&Value>) -> Table {
    let objects: Vec<&serde_json::Map<String, Value>> = match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_object).collect(),
        Some(Value::Object(obj)) => vec![obj],
        Some(_) => Vec::new(),
    };

    if objects.is_empty() {
        return Table::empty();
    }

    let flat_rows: Vec<Vec<(String, Scalar)>> = objects
        .into_iter()
        .map(|obj| {
            let mut cells = Vec::new();
            for (key, nested) in obj {
                flatten_into(key, nested, &mut cells);
            }
            cells
        })
        .collect();

    let mut columns: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for row in &flat_rows {
        for (key, _) in row {
            if !index.contains_key(key) {
                index.insert(key.clone(), columns.len());
                columns.push(key.clone());
            }
        }
    }

    let rows = flat_rows
        .into_iter()
        .map(|flat| {
            let mut cells = vec![Scalar::Null; columns.len()];
            for (key, value) in flat {
                cells[index[&key]] = value;
            }
            cells
        })
        .collect();

    Table::new(columns, rows)
}

/// Nested objects become dotted-path keys (`countryInfo.lat`); everything
/// else is a leaf.
fn flatten_into(prefix: &str, value: &Value, out: &mut Vec<(String, Scalar)>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                flatten_into(&format!("{}.{}", prefix, key), nested, out);
            }
        }
        leaf => out.push((prefix.to_string(), Scalar::from_json(leaf))),
    }
}
