use crate::domain::model::LoadReport;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Three stages of an analysis run. `extract` reads the datasets, `transform`
/// filters and groups them in memory, `load` renders artifacts.
#[async_trait]
pub trait Pipeline: Send + Sync {
    type Dataset: Send;
    type Analysis: Send;

    fn name(&self) -> &'static str;

    async fn extract(&self) -> Result<Self::Dataset>;
    async fn transform(&self, data: Self::Dataset) -> Result<Self::Analysis>;
    async fn load(&self, analysis: Self::Analysis) -> Result<LoadReport>;
}
