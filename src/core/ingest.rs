use crate::core::csv_io;
use crate::core::fetch::{FetchOutcome, Fetcher};
use crate::core::flatten::table_from_json;
use crate::domain::model::Table;
use crate::domain::ports::{IngestConfig, Pipeline, Storage};
use crate::utils::error::Result;

/// Column the continent filter matches against.
pub const CONTINENT_COLUMN: &str = "continent";

/// Ingestion stage: one API read, flatten to a table, keep one continent,
/// persist as CSV. API failures degrade to an empty table; only local I/O
/// problems become hard errors.
pub struct IngestPipeline<S: Storage, C: IngestConfig> {
    storage: S,
    config: C,
    fetcher: Fetcher,
}

impl<S: Storage, C: IngestConfig> IngestPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            fetcher: Fetcher::new(),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: IngestConfig> Pipeline for IngestPipeline<S, C> {
    type Extracted = FetchOutcome;
    type Transformed = Table;

    async fn extract(&self) -> Result<FetchOutcome> {
        tracing::debug!("Making API request to: {}", self.config.api_endpoint());
        Ok(self.fetcher.fetch_json(self.config.api_endpoint()).await)
    }

    async fn transform(&self, outcome: FetchOutcome) -> Result<Table> {
        let payload = match outcome {
            FetchOutcome::Success(value) => Some(value),
            FetchOutcome::Failure { kind, message } => {
                tracing::warn!("API error ({}): {}", kind, message);
                None
            }
        };

        let table = table_from_json(payload.as_ref());
        tracing::info!(
            "Normalized {} rows across {} columns",
            table.row_count(),
            table.column_count()
        );

        if table.is_empty() {
            tracing::warn!("Table is empty, skipping the continent filter");
            return Ok(table);
        }

        if table.column_index(CONTINENT_COLUMN).is_none() {
            tracing::warn!(
                "Column '{}' is missing from the response, no rows will match",
                CONTINENT_COLUMN
            );
        }

        let filtered = table.filter_eq(CONTINENT_COLUMN, self.config.continent());
        tracing::info!(
            "{} rows match continent '{}'",
            filtered.row_count(),
            self.config.continent()
        );
        tracing::debug!("Filtered table:\n{}", filtered);

        Ok(filtered)
    }

    async fn load(&self, table: Table) -> Result<String> {
        if table.is_empty() {
            tracing::warn!("Table is empty. No data was saved.");
            return Ok("no data was saved".to_string());
        }

        let bytes = csv_io::to_csv_bytes(&table)?;
        self.storage.write_file(self.config.csv_path(), &bytes).await?;

        let summary = format!(
            "saved {} rows to '{}'",
            table.row_count(),
            self.config.csv_path()
        );
        tracing::info!("Data successfully {}", summary);
        Ok(summary)
    }
}
