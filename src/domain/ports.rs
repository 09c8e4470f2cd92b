use async_trait::async_trait;

use crate::utils::error::Result;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait IngestConfig: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn csv_path(&self) -> &str;
    fn continent(&self) -> &str;
}

pub trait PublishConfig: Send + Sync {
    fn spreadsheet_id(&self) -> &str;
    fn csv_path(&self) -> &str;
}

/// The extract -> transform -> load shape both stages share. The stages carry
/// different intermediate data, so the steps are connected through associated
/// types; `load` returns a human-readable summary of what happened.
#[async_trait]
pub trait Pipeline: Send + Sync {
    type Extracted: Send;
    type Transformed: Send;

    async fn extract(&self) -> Result<Self::Extracted>;
    async fn transform(&self, data: Self::Extracted) -> Result<Self::Transformed>;
    async fn load(&self, data: Self::Transformed) -> Result<String>;
}
