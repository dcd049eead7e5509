use crate::core::session::Session;
use crate::domain::model::CustomerId;
use crate::domain::ports::{ConfigProvider, DatasetSource, Pipeline, Storage};
use crate::render::{html, Dashboard, DashboardOptions};
use crate::utils::error::Result;

/// Loads the customer table, builds one customer's dashboard, writes it as HTML.
pub struct DashboardPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    source: Box<dyn DatasetSource>,
    options: DashboardOptions,
}

impl<S: Storage, C: ConfigProvider> DashboardPipeline<S, C> {
    pub fn new(storage: S, config: C, source: Box<dyn DatasetSource>) -> Self {
        let options = DashboardOptions::from_config(&config);
        Self {
            storage,
            config,
            source,
            options,
        }
    }
}

/// File name for a customer's page; characters unsafe in file names become `_`.
pub fn page_filename(customer_id: &CustomerId) -> String {
    let safe: String = customer_id
        .as_str()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("customer_{}.html", safe)
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for DashboardPipeline<S, C> {
    async fn extract(&self) -> Result<Session> {
        let description = self.source.describe();
        tracing::info!("🚀 Loading customers from {}", description);

        let table = self.source.fetch().await?;
        tracing::info!("📋 Loaded {} customers", table.len());

        Ok(Session::new(table, description))
    }

    async fn transform(&self, session: &Session, customer_id: &CustomerId) -> Result<Dashboard> {
        tracing::debug!("Building dashboard for customer {}", customer_id);
        session.dashboard(customer_id, &self.options)
    }

    async fn load(&self, dashboard: &Dashboard) -> Result<String> {
        let filename = page_filename(&dashboard.customer_id);
        let page = html::render_page(dashboard)?;

        tracing::debug!("Writing dashboard page ({} bytes) to {}", page.len(), filename);
        self.storage.write_file(&filename, page.as_bytes()).await?;

        Ok(format!(
            "{}/{}",
            self.config.output_path().trim_end_matches('/'),
            filename
        ))
    }
}
