pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use self::cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use crate::adapters::catalog::{DEFAULT_DATASET_ID, DEFAULT_ENDPOINT};
    use crate::adapters::SourceSettings;
    use crate::domain::ports::ConfigProvider;
    use crate::render::DEFAULT_TITLE;
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};
    use std::collections::HashMap;

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "customer-360")]
    #[command(about = "Customer 360 dashboard for one customer of an AI Catalog dataset")]
    pub struct CliConfig {
        /// AI Catalog dataset ID
        #[arg(long, default_value = DEFAULT_DATASET_ID)]
        pub dataset_id: String,

        /// Catalog API endpoint
        #[arg(long, env = "DATAROBOT_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
        pub endpoint: String,

        /// Catalog API token
        #[arg(long, env = "DATAROBOT_API_TOKEN", hide_env_values = true)]
        #[serde(skip_serializing)]
        pub api_token: Option<String>,

        /// Read customers from a local CSV file instead of the catalog
        #[arg(long)]
        pub csv_path: Option<String>,

        /// Customer to show; defaults to the first one in the dataset
        #[arg(long)]
        pub customer_id: Option<String>,

        #[arg(long, default_value = "./output")]
        pub output_path: String,

        #[arg(long, default_value = DEFAULT_TITLE)]
        pub title: String,

        /// Number of tenure histogram bins
        #[arg(long, default_value = "10")]
        pub bins: usize,

        /// Hide the density curve on the tenure histogram
        #[arg(long)]
        pub no_kde: bool,

        #[arg(long, default_value = "640")]
        pub chart_width: u32,

        #[arg(long, default_value = "480")]
        pub chart_height: u32,

        #[arg(long, default_value = "30")]
        pub timeout_seconds: u64,

        /// Keep prompting for customers after the first render
        #[arg(long)]
        pub interactive: bool,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log CPU and memory usage per phase")]
        pub monitor: bool,
    }

    impl CliConfig {
        pub fn source_settings(&self) -> Result<SourceSettings> {
            if let Some(path) = &self.csv_path {
                return Ok(SourceSettings::CsvFile { path: path.clone() });
            }

            let api_token = validation::validate_required_field("api_token", &self.api_token)?;
            Ok(SourceSettings::Catalog {
                endpoint: self.endpoint.clone(),
                api_token: api_token.clone(),
                dataset_id: self.dataset_id.clone(),
                timeout_seconds: Some(self.timeout_seconds),
                headers: HashMap::new(),
            })
        }
    }

    impl ConfigProvider for CliConfig {
        fn title(&self) -> &str {
            &self.title
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn histogram_bins(&self) -> usize {
            self.bins
        }

        fn kde_enabled(&self) -> bool {
            !self.no_kde
        }

        fn chart_size(&self) -> (u32, u32) {
            (self.chart_width, self.chart_height)
        }

        fn customer_id(&self) -> Option<&str> {
            self.customer_id.as_deref()
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            match &self.csv_path {
                Some(path) => validation::validate_path("csv_path", path)?,
                None => {
                    validation::validate_url("endpoint", &self.endpoint)?;
                    validation::validate_non_empty_string("dataset_id", &self.dataset_id)?;
                    let token = validation::validate_required_field("api_token", &self.api_token)?;
                    validation::validate_non_empty_string("api_token", token)?;
                }
            }

            if let Some(customer_id) = &self.customer_id {
                validation::validate_non_empty_string("customer_id", customer_id)?;
            }

            validation::validate_presentation(&self.output_path, self.bins, self.chart_size())
        }
    }

}
