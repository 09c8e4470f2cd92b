use crate::core::csv_io;
use crate::domain::model::{Scalar, Table};
use crate::domain::ports::{Pipeline, PublishConfig, Storage};
use crate::sheets::client::{quote_sheet_title, SheetsClient};
use crate::utils::error::Result;

/// The string matrix sent to the spreadsheet service: header row plus data
/// rows, every cell already formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetPayload {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetPayload {
    pub fn from_table(table: &Table) -> Self {
        Self {
            header: table.columns().to_vec(),
            rows: table
                .rows()
                .iter()
                .map(|row| row.iter().map(format_cell).collect())
                .collect(),
        }
    }
}

/// Numbers are sent with exactly one fractional digit; everything else
/// passes through as its text.
fn format_cell(cell: &Scalar) -> String {
    match cell {
        Scalar::Number(n) => format!("{:.1}", n),
        other => other.to_string(),
    }
}

/// Publishing stage: read the CSV hand-off file back, format the cells and
/// overwrite the first worksheet of the target spreadsheet. Unlike
/// ingestion, every failure here is fatal to the run.
pub struct PublishPipeline<S: Storage, C: PublishConfig> {
    storage: S,
    config: C,
    client: SheetsClient,
}

impl<S: Storage, C: PublishConfig> PublishPipeline<S, C> {
    pub fn new(storage: S, client: SheetsClient, config: C) -> Self {
        Self {
            storage,
            config,
            client,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: PublishConfig> Pipeline for PublishPipeline<S, C> {
    type Extracted = Table;
    type Transformed = SheetPayload;

    async fn extract(&self) -> Result<Table> {
        let bytes = self.storage.read_file(self.config.csv_path()).await?;
        let table = csv_io::from_csv_bytes(&bytes)?;
        tracing::info!(
            "Read {} rows across {} columns from '{}'",
            table.row_count(),
            table.column_count(),
            self.config.csv_path()
        );
        Ok(table)
    }

    async fn transform(&self, table: Table) -> Result<SheetPayload> {
        Ok(SheetPayload::from_table(&table))
    }

    async fn load(&self, payload: SheetPayload) -> Result<String> {
        let spreadsheet = self
            .client
            .open_or_create(self.config.spreadsheet_id())
            .await?;
        let worksheet = quote_sheet_title(spreadsheet.first_sheet_title()?);

        // Full overwrite: clear, header at row 1, data from row 2.
        self.client.clear_values(spreadsheet.id(), &worksheet).await?;
        self.client
            .update_values(
                spreadsheet.id(),
                &format!("{}!A1", worksheet),
                std::slice::from_ref(&payload.header),
            )
            .await?;
        if !payload.rows.is_empty() {
            self.client
                .update_values(spreadsheet.id(), &format!("{}!A2", worksheet), &payload.rows)
                .await?;
        }

        let summary = format!(
            "published {} rows to spreadsheet '{}'",
            payload.rows.len(),
            spreadsheet.id()
        );
        tracing::info!("Data from '{}' {}", self.config.csv_path(), summary);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_are_formatted_with_one_fractional_digit() {
        assert_eq!(format_cell(&Scalar::Number(42.0)), "42.0");
        assert_eq!(format_cell(&Scalar::Number(-14.235)), "-14.2");
        assert_eq!(format_cell(&Scalar::Number(0.56)), "0.6");
    }

    #[test]
    fn test_non_numeric_cells_pass_through() {
        assert_eq!(format_cell(&Scalar::Text("Brazil".to_string())), "Brazil");
        assert_eq!(format_cell(&Scalar::Bool(true)), "true");
        assert_eq!(format_cell(&Scalar::Null), "");
    }

    #[test]
    fn test_payload_keeps_header_and_row_order() {
        let table = Table::new(
            vec!["name".to_string(), "cases".to_string()],
            vec![
                vec![Scalar::Text("Brazil".to_string()), Scalar::Number(100.0)],
                vec![Scalar::Text("Peru".to_string()), Scalar::Number(42.0)],
            ],
        );

        let payload = SheetPayload::from_table(&table);

        assert_eq!(payload.header, vec!["name", "cases"]);
        assert_eq!(payload.rows[0], vec!["Brazil", "100.0"]);
        assert_eq!(payload.rows[1], vec!["Peru", "42.0"]);
    }
}
