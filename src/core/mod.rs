pub mod csv_io;
pub mod etl;
pub mod fetch;
pub mod flatten;
pub mod ingest;
pub mod publish;

pub use crate::domain::model::{Scalar, Table};
pub use crate::domain::ports::{IngestConfig, Pipeline, PublishConfig, Storage};
pub use crate::utils::error::Result;
