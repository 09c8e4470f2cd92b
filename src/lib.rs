pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod sheets;
pub mod utils;

pub use adapters::LocalStorage;
pub use config::{Cli, Command, IngestSettings, PublishSettings};
pub use core::{etl::EtlEngine, ingest::IngestPipeline, publish::PublishPipeline};
pub use domain::model::{Scalar, Table};
pub use utils::error::{EtlError, Result};
