use crate::domain::model::{Scalar, Table};
use crate::utils::error::{EtlError, Result};

/// Serializes a table as CSV: one header line of column names, one line per
/// row, no index column.
pub fn to_csv_bytes(table: &Table) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer.flush()?;
    writer.into_inner().map_err(|e| EtlError::ProcessingError {
        message: format!("failed to finish CSV buffer: {}", e.error()),
    })
}

/// Reads a CSV back into a table, inferring cell types from content. Ragged
/// or otherwise malformed input propagates the underlying CSV error.
pub fn from_csv_bytes(bytes: &[u8]) -> Result<Table> {
    let mut reader = csv::Reader::from_reader(bytes);
    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(infer_scalar).collect());
    }

    Ok(Table::new(columns, rows))
}

fn infer_scalar(field: &str) -> Scalar {
    if field.is_empty() {
        return Scalar::Null;
    }
    match field {
        "true" => return Scalar::Bool(true),
        "false" => return Scalar::Bool(false),
        _ => {}
    }
    // parse::<f64> accepts "inf"/"NaN"; only finite values count as numbers.
    if let Ok(n) = field.parse::<f64>() {
        if n.is_finite() {
            return Scalar::Number(n);
        }
    }
    Scalar::Text(field.to_string())
}
