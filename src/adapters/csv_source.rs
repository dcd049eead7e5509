use crate::domain::model::CustomerTable;
use crate::domain::ports::{DatasetSource, Storage};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Customer table from a CSV file reachable through a `Storage`.
pub struct CsvFileSource<S: Storage> {
    storage: S,
    path: String,
}

impl<S: Storage> CsvFileSource<S> {
    pub fn new(storage: S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
        }
    }
}

#[async_trait]
impl<S: Storage> DatasetSource for CsvFileSource<S> {
    fn describe(&self) -> String {
        format!("CSV file {}", self.path)
    }

    async fn fetch(&self) -> Result<CustomerTable> {
        tracing::debug!("Reading customer CSV from {}", self.path);
        let data = self.storage.read_file(&self.path).await?;
        CustomerTable::from_csv_reader(data.as_slice())
    }
}
