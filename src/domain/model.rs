use std::fmt;

use serde::{Deserialize, Serialize};

/// A single cell value. Nested JSON is flattened before it ever becomes a
/// `Scalar`, so arrays and objects only appear here as their JSON text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn from_json(value: &serde_json::Value) -> Scalar {
        match value {
            serde_json::Value::Null => Scalar::Null,
            serde_json::Value::Bool(b) => Scalar::Bool(*b),
            serde_json::Value::Number(n) => n.as_f64().map(Scalar::Number).unwrap_or(Scalar::Null),
            serde_json::Value::String(s) => Scalar::Text(s.clone()),
            // Arrays (and any object a caller passes directly) keep their
            // JSON text so no data is dropped on the way to the CSV.
            other => Scalar::Text(other.to_string()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", b),
            // Integral values print without a decimal point so source
            // integers survive the CSV unchanged.
            Scalar::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => {
                write!(f, "{}", *n as i64)
            }
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// An ordered row/column table. Invariant: every row holds exactly
/// `columns.len()` cells, aligned with the header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Scalar>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Scalar>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == columns.len()));
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Scalar>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// A table with either axis empty carries no data.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Returns an independent copy holding only the rows whose `column` cell
    /// equals `expected` exactly. Row order and the full column set are
    /// preserved. A missing column matches no rows.
    pub fn filter_eq(&self, column: &str, expected: &str) -> Table {
        let rows = match self.column_index(column) {
            Some(idx) => self
                .rows
                .iter()
                .filter(|row| matches!(&row[idx], Scalar::Text(s) if s == expected))
                .cloned()
                .collect(),
            None => Vec::new(),
        };
        Table {
            columns: self.columns.clone(),
            rows,
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.columns.join(","))?;
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
            writeln!(f, "{}", cells.join(","))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        Table::new(
            vec![
                "name".to_string(),
                "continent".to_string(),
                "cases".to_string(),
            ],
            vec![
                vec![
                    Scalar::Text("Brazil".to_string()),
                    Scalar::Text("South America".to_string()),
                    Scalar::Number(100.0),
                ],
                vec![
                    Scalar::Text("France".to_string()),
                    Scalar::Text("Europe".to_string()),
                    Scalar::Number(50.0),
                ],
            ],
        )
    }

    #[test]
    fn test_scalar_display() {
        assert_eq!(Scalar::Number(100.0).to_string(), "100");
        assert_eq!(Scalar::Number(-14.235004).to_string(), "-14.235004");
        assert_eq!(Scalar::Text("Brazil".to_string()).to_string(), "Brazil");
        assert_eq!(Scalar::Bool(true).to_string(), "true");
        assert_eq!(Scalar::Null.to_string(), "");
    }

    #[test]
    fn test_empty_table_has_no_axes() {
        let table = Table::empty();
        assert!(table.is_empty());
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 0);
    }

    #[test]
    fn test_table_with_columns_but_no_rows_is_empty() {
        let table = Table::new(vec!["name".to_string()], vec![]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_filter_eq_keeps_matching_rows_and_all_columns() {
        let table = sample_table();
        let filtered = table.filter_eq("continent", "South America");

        assert_eq!(filtered.row_count(), 1);
        assert_eq!(filtered.columns(), table.columns());
        assert_eq!(filtered.rows()[0][0], Scalar::Text("Brazil".to_string()));
    }

    #[test]
    fn test_filter_eq_is_an_independent_copy() {
        let table = sample_table();
        let mut filtered = table.filter_eq("continent", "South America");
        filtered.rows[0][0] = Scalar::Text("Argentina".to_string());

        assert_eq!(table.rows()[0][0], Scalar::Text("Brazil".to_string()));
    }

    #[test]
    fn test_filter_eq_is_idempotent() {
        let table = sample_table();
        let once = table.filter_eq("continent", "South America");
        let twice = once.filter_eq("continent", "South America");

        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_eq_missing_column_matches_nothing() {
        let table = sample_table();
        let filtered = table.filter_eq("region", "South America");

        assert_eq!(filtered.row_count(), 0);
        assert_eq!(filtered.columns(), table.columns());
    }

    #[test]
    fn test_filter_eq_is_exact_match_only() {
        let table = sample_table();
        assert_eq!(table.filter_eq("continent", "south america").row_count(), 0);
        assert_eq!(table.filter_eq("continent", "South").row_count(), 0);
    }
}
