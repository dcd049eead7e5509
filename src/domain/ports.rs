use crate::core::session::Session;
use crate::domain::model::{CustomerId, CustomerTable};
use crate::render::Dashboard;
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

pub trait ConfigProvider: Send + Sync {
    fn title(&self) -> &str;
    fn output_path(&self) -> &str;
    fn histogram_bins(&self) -> usize;
    fn kde_enabled(&self) -> bool;
    fn chart_size(&self) -> (u32, u32);
    fn customer_id(&self) -> Option<&str>;
}

/// Where the customer table comes from.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    fn describe(&self) -> String;
    async fn fetch(&self) -> Result<CustomerTable>;
}

/// Picks exactly one customer out of the table's IDs.
pub trait CustomerSelector {
    fn select(&mut self, ids: &[CustomerId]) -> Result<CustomerId>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Session>;
    async fn transform(&self, session: &Session, customer_id: &CustomerId) -> Result<Dashboard>;
    async fn load(&self, dashboard: &Dashboard) -> Result<String>;
}
