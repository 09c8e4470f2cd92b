use std::path::Path;

use serde::Deserialize;

use crate::utils::error::{EtlError, Result};

/// Optional TOML configuration; every field can still be overridden on the
/// command line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub ingest: IngestFileConfig,
    #[serde(default)]
    pub publish: PublishFileConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestFileConfig {
    pub api_endpoint: Option<String>,
    pub csv_path: Option<String>,
    pub continent: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublishFileConfig {
    pub credentials_path: Option<String>,
    pub spreadsheet_id: Option<String>,
    pub csv_path: Option<String>,
}

impl FileConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| EtlError::ConfigError {
            message: format!("cannot read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&raw).map_err(|e| EtlError::ConfigError {
            message: format!("invalid config file '{}': {}", path.display(), e),
        })
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| EtlError::ConfigError {
            message: e.to_string(),
        })
    }
}
