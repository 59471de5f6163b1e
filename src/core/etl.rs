use crate::core::Pipeline;
use crate::domain::model::LoadReport;
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<LoadReport> {
        let started = Instant::now();
        tracing::info!("Starting {} analysis", self.pipeline.name());

        tracing::info!("Reading datasets...");
        let dataset = self.pipeline.extract().await?;

        tracing::info!("Filtering and grouping...");
        let analysis = self.pipeline.transform(dataset).await?;

        tracing::info!("Rendering results...");
        let report = self.pipeline.load(analysis).await?;

        tracing::info!(
            "{} analysis wrote {} artifacts to {} in {:?}",
            self.pipeline.name(),
            report.artifacts.len(),
            report.output_dir.display(),
            started.elapsed()
        );
        Ok(report)
    }
}
