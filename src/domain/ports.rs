use crate::domain::model::{Measurement, NewMeasurement, SearchQuery};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    /// Returns `Ok(None)` when the file does not exist yet.
    fn read_file(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Option<Vec<u8>>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Human-readable location of `path`, for log and CLI output.
    fn locate(&self, path: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn data_dir(&self) -> &str;
    fn store_file(&self) -> &str;
    fn export_path(&self) -> &str;
    fn export_formats(&self) -> &[String];
    fn bundle_exports(&self) -> bool;
}

#[async_trait]
pub trait MeasurementRepository: Send + Sync {
    async fn all(&self) -> Result<Vec<Measurement>>;
    async fn insert_many(&self, rows: Vec<NewMeasurement>) -> Result<Vec<Measurement>>;
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Measurement>>;
    async fn delete(&self, id: u64) -> Result<Measurement>;
    async fn delete_all(&self) -> Result<usize>;
}
