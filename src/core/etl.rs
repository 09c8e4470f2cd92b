use crate::domain::ports::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Extracting data...");
        let raw = self.pipeline.extract().await?;

        tracing::info!("Transforming data...");
        let prepared = self.pipeline.transform(raw).await?;

        tracing::info!("Loading data...");
        let summary = self.pipeline.load(prepared).await?;

        tracing::info!("Done: {}", summary);
        Ok(summary)
    }
}
