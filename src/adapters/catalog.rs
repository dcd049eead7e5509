use crate::domain::model::CustomerTable;
use crate::domain::ports::DatasetSource;
use crate::utils::error::{DashboardError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://app.datarobot.com/api/v2";
pub const DEFAULT_DATASET_ID: &str = "66bb9a2dea25038602dbaa61";

const ERROR_EXCERPT_LEN: usize = 200;

/// Dataset metadata as returned by the AI Catalog.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetInfo {
    pub dataset_id: String,
    pub name: Option<String>,
    pub row_count: Option<u64>,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Reads one dataset out of the DataRobot AI Catalog. No retries.
pub struct CatalogSource {
    client: Client,
    endpoint: String,
    api_token: String,
    dataset_id: String,
    timeout: Option<Duration>,
    headers: HashMap<String, String>,
}

impl CatalogSource {
    pub fn new(
        endpoint: impl Into<String>,
        api_token: impl Into<String>,
        dataset_id: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_token: api_token.into(),
            dataset_id: dataset_id.into(),
            timeout: None,
            headers: HashMap::new(),
        }
    }

    pub fn with_timeout(mut self, seconds: Option<u64>) -> Self {
        self.timeout = seconds.map(Duration::from_secs);
        self
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    fn dataset_url(&self, suffix: &str) -> String {
        format!(
            "{}/datasets/{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.dataset_id,
            suffix
        )
    }

    fn request(&self, url: &str) -> RequestBuilder {
        let mut request = self.client.get(url).bearer_auth(&self.api_token);

        // 添加自定義標頭
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        request
    }

    pub async fn fetch_info(&self) -> Result<DatasetInfo> {
        let url = self.dataset_url("");
        tracing::debug!("Requesting dataset metadata: {}", url);

        let response = self.check_status(self.request(&url).send().await?).await?;
        let info = response.json::<DatasetInfo>().await?;
        Ok(info)
    }

    pub async fn fetch_csv(&self) -> Result<Vec<u8>> {
        let url = self.dataset_url("file/");
        tracing::debug!("Downloading dataset file: {}", url);

        let response = self.check_status(self.request(&url).send().await?).await?;
        let bytes = response.bytes().await?;
        tracing::debug!("Downloaded {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }

    async fn check_status(&self, response: Response) -> Result<Response> {
        let status = response.status();
        tracing::debug!("Catalog response status: {}", status);

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::NOT_FOUND {
            return Err(DashboardError::DatasetNotFound {
                dataset_id: self.dataset_id.clone(),
            });
        }

        let body = response.text().await.unwrap_or_default();
        Err(DashboardError::CatalogError {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }
}

// 目錄服務的錯誤內容通常是 {"message": "..."}
fn error_message(body: &str) -> String {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());

    message.chars().take(ERROR_EXCERPT_LEN).collect()
}

#[async_trait]
impl DatasetSource for CatalogSource {
    fn describe(&self) -> String {
        format!("AI Catalog dataset {} at {}", self.dataset_id, self.endpoint)
    }

    async fn fetch(&self) -> Result<CustomerTable> {
        let info = self.fetch_info().await?;
        tracing::info!(
            "📚 Catalog dataset '{}' ({}), {} rows",
            info.name.as_deref().unwrap_or("unnamed"),
            info.dataset_id,
            info.row_count
                .map(|n| n.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );

        let csv = self.fetch_csv().await?;
        CustomerTable::from_csv_reader(csv.as_slice())
    }
}
