use crate::adapters::catalog::DEFAULT_ENDPOINT;
use crate::adapters::SourceSettings;
use crate::domain::ports::ConfigProvider;
use crate::render::DEFAULT_TITLE;
use crate::utils::error::{DashboardError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub dashboard: DashboardSection,
    pub source: SourceConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub charts: ChartsConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DashboardSection {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub r#type: String,
    pub endpoint: Option<String>,
    pub dataset_id: Option<String>,
    pub api_token: Option<String>,
    pub path: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SelectionConfig {
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub output_path: String,
    pub print_summary: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChartsConfig {
    pub histogram_bins: Option<usize>,
    pub kde: Option<bool>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_format: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DashboardError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DashboardError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATAROBOT_API_TOKEN})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        static ENV_VAR: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();
        let re = ENV_VAR
            .get_or_init(|| Regex::new(r"\$\{([^}]+)\}"))
            .as_ref()
            .map_err(|e| DashboardError::ConfigError {
                message: format!("Invalid substitution pattern: {}", e),
            })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn source_settings(&self) -> Result<SourceSettings> {
        match self.source.r#type.as_str() {
            "catalog" => {
                let dataset_id =
                    validation::validate_required_field("source.dataset_id", &self.source.dataset_id)?;
                let api_token =
                    validation::validate_required_field("source.api_token", &self.source.api_token)?;
                Ok(SourceSettings::Catalog {
                    endpoint: self
                        .source
                        .endpoint
                        .clone()
                        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
                    api_token: api_token.clone(),
                    dataset_id: dataset_id.clone(),
                    timeout_seconds: self.source.timeout_seconds,
                    headers: self.source.headers.clone().unwrap_or_default(),
                })
            }
            "csv" => {
                let path = validation::validate_required_field("source.path", &self.source.path)?;
                Ok(SourceSettings::CsvFile { path: path.clone() })
            }
            other => Err(DashboardError::InvalidConfigValueError {
                field: "source.type".to_string(),
                value: other.to_string(),
                reason: "Supported source types: catalog, csv".to_string(),
            }),
        }
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        match self.source_settings()? {
            SourceSettings::Catalog {
                endpoint,
                api_token,
                dataset_id,
                ..
            } => {
                validation::validate_url("source.endpoint", &endpoint)?;
                validation::validate_non_empty_string("source.dataset_id", &dataset_id)?;
                if api_token.starts_with("${") {
                    return Err(DashboardError::MissingConfigError {
                        field: api_token.trim_start_matches("${").trim_end_matches('}').to_string(),
                    });
                }
                validation::validate_non_empty_string("source.api_token", &api_token)?;
            }
            SourceSettings::CsvFile { path } => validation::validate_path("source.path", &path)?,
        }

        validation::validate_presentation(
            &self.output.output_path,
            self.histogram_bins(),
            self.chart_size(),
        )
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_format(&self) -> LogFormat {
        LogFormat::from_name(self.monitoring.as_ref().and_then(|m| m.log_format.as_deref()))
    }

    pub fn print_summary(&self) -> bool {
        self.output.print_summary.unwrap_or(true)
    }
}

impl ConfigProvider for TomlConfig {
    fn title(&self) -> &str {
        self.dashboard.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    fn output_path(&self) -> &str {
        &self.output.output_path
    }

    fn histogram_bins(&self) -> usize {
        self.charts.histogram_bins.unwrap_or(10)
    }

    fn kde_enabled(&self) -> bool {
        self.charts.kde.unwrap_or(true)
    }

    fn chart_size(&self) -> (u32, u32) {
        (self.charts.width.unwrap_or(640), self.charts.height.unwrap_or(480))
    }

    fn customer_id(&self) -> Option<&str> {
        self.selection.customer_id.as_deref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
