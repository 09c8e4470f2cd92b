pub mod file;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::file::{IngestFileConfig, PublishFileConfig};
use crate::domain::ports::{IngestConfig, PublishConfig};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_url, Validate,
};

pub const DEFAULT_API_ENDPOINT: &str = "https://disease.sh/v3/covid-19/countries";
pub const DEFAULT_CSV_PATH: &str = "table.csv";
pub const DEFAULT_CONTINENT: &str = "South America";
pub const DEFAULT_CREDENTIALS_PATH: &str = "credentials.json";

#[derive(Debug, Parser)]
#[command(name = "covid-sheets")]
#[command(about = "Fetches per-country COVID-19 statistics and publishes them to Google Sheets")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Optional TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch statistics, keep one continent and write the CSV file
    Ingest(IngestArgs),
    /// Read the CSV file and overwrite the first sheet of a spreadsheet
    Publish(PublishArgs),
}

#[derive(Debug, Clone, Args)]
pub struct IngestArgs {
    /// Statistics API endpoint
    #[arg(long)]
    pub api_endpoint: Option<String>,

    /// Path of the CSV file to write
    #[arg(long)]
    pub output: Option<String>,

    /// Continent the rows are filtered to
    #[arg(long)]
    pub continent: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct PublishArgs {
    /// Path to the service-account credential file
    #[arg(long)]
    pub credentials: Option<PathBuf>,

    /// Identifier of the target spreadsheet
    #[arg(long)]
    pub spreadsheet_id: Option<String>,

    /// Path of the CSV file to publish
    #[arg(long)]
    pub csv: Option<String>,
}

/// Settings for the ingestion stage, resolved CLI > config file > defaults.
#[derive(Debug, Clone)]
pub struct IngestSettings {
    pub api_endpoint: String,
    pub csv_path: String,
    pub continent: String,
}

impl IngestSettings {
    pub fn resolve(args: IngestArgs, file: IngestFileConfig) -> Self {
        Self {
            api_endpoint: args
                .api_endpoint
                .or(file.api_endpoint)
                .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string()),
            csv_path: args
                .output
                .or(file.csv_path)
                .unwrap_or_else(|| DEFAULT_CSV_PATH.to_string()),
            continent: args
                .continent
                .or(file.continent)
                .unwrap_or_else(|| DEFAULT_CONTINENT.to_string()),
        }
    }
}

impl IngestConfig for IngestSettings {
    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn csv_path(&self) -> &str {
        &self.csv_path
    }

    fn continent(&self) -> &str {
        &self.continent
    }
}

impl Validate for IngestSettings {
    fn validate(&self) -> Result<()> {
        validate_url("api_endpoint", &self.api_endpoint)?;
        validate_path("output", &self.csv_path)?;
        validate_non_empty_string("continent", &self.continent)?;
        Ok(())
    }
}

/// Settings for the publishing stage. `spreadsheet_id` has no default and
/// must come from the CLI or the config file.
#[derive(Debug, Clone)]
pub struct PublishSettings {
    pub credentials_path: PathBuf,
    pub spreadsheet_id: String,
    pub csv_path: String,
}

impl PublishSettings {
    pub fn resolve(args: PublishArgs, file: PublishFileConfig) -> Result<Self> {
        let spreadsheet_id = args
            .spreadsheet_id
            .or(file.spreadsheet_id)
            .ok_or_else(|| EtlError::MissingConfigError {
                field: "spreadsheet_id".to_string(),
            })?;

        Ok(Self {
            credentials_path: args
                .credentials
                .or(file.credentials_path.map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_PATH)),
            spreadsheet_id,
            csv_path: args
                .csv
                .or(file.csv_path)
                .unwrap_or_else(|| DEFAULT_CSV_PATH.to_string()),
        })
    }
}

impl PublishConfig for PublishSettings {
    fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    fn csv_path(&self) -> &str {
        &self.csv_path
    }
}

impl Validate for PublishSettings {
    fn validate(&self) -> Result<()> {
        validate_path("credentials", &self.credentials_path.to_string_lossy())?;
        validate_path("csv", &self.csv_path)?;
        validate_non_empty_string("spreadsheet_id", &self.spreadsheet_id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_ingest_args() -> IngestArgs {
        IngestArgs {
            api_endpoint: None,
            output: None,
            continent: None,
        }
    }

    #[test]
    fn test_ingest_defaults() {
        let settings = IngestSettings::resolve(no_ingest_args(), IngestFileConfig::default());

        assert_eq!(settings.api_endpoint, DEFAULT_API_ENDPOINT);
        assert_eq!(settings.csv_path, "table.csv");
        assert_eq!(settings.continent, "South America");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides_file_config() {
        let args = IngestArgs {
            api_endpoint: Some("http://localhost:9999/countries".to_string()),
            output: None,
            continent: None,
        };
        let file = IngestFileConfig {
            api_endpoint: Some("http://filehost/countries".to_string()),
            csv_path: Some("from-file.csv".to_string()),
            continent: None,
        };

        let settings = IngestSettings::resolve(args, file);

        assert_eq!(settings.api_endpoint, "http://localhost:9999/countries");
        assert_eq!(settings.csv_path, "from-file.csv");
    }

    #[test]
    fn test_publish_requires_spreadsheet_id() {
        let args = PublishArgs {
            credentials: None,
            spreadsheet_id: None,
            csv: None,
        };

        let result = PublishSettings::resolve(args, PublishFileConfig::default());

        assert!(matches!(
            result,
            Err(EtlError::MissingConfigError { field }) if field == "spreadsheet_id"
        ));
    }

    #[test]
    fn test_publish_defaults_fill_in_around_the_id() {
        let args = PublishArgs {
            credentials: None,
            spreadsheet_id: Some("1U6cNm54".to_string()),
            csv: None,
        };

        let settings = PublishSettings::resolve(args, PublishFileConfig::default()).unwrap();

        assert_eq!(settings.credentials_path, PathBuf::from("credentials.json"));
        assert_eq!(settings.csv_path, "table.csv");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_invalid_endpoint_fails_validation() {
        let args = IngestArgs {
            api_endpoint: Some("not a url".to_string()),
            output: None,
            continent: None,
        };

        let settings = IngestSettings::resolve(args, IngestFileConfig::default());

        assert!(settings.validate().is_err());
    }
}
