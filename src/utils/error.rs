use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Catalog request failed with status {status}: {message}")]
    CatalogError { status: u16, message: String },

    #[error("Dataset '{dataset_id}' not found in catalog")]
    DatasetNotFound { dataset_id: String },

    #[error("Dataset contains no customer records")]
    EmptyDataset,

    #[error("Customer ID '{customer_id}' appears more than once in the dataset")]
    DuplicateCustomerId { customer_id: String },

    #[error("Customer '{customer_id}' not found in the dataset")]
    CustomerNotFound { customer_id: String },

    #[error("Selection error: {message}")]
    SelectionError { message: String },

    #[error("Chart rendering error: {message}")]
    ChartError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Selection,
    Rendering,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DashboardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) | Self::CatalogError { .. } | Self::DatasetNotFound { .. } => {
                ErrorCategory::Network
            }
            Self::CsvError(_)
            | Self::SerializationError(_)
            | Self::EmptyDataset
            | Self::DuplicateCustomerId { .. } => ErrorCategory::Data,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::CustomerNotFound { .. } | Self::SelectionError { .. } => {
                ErrorCategory::Selection
            }
            Self::ChartError { .. } => ErrorCategory::Rendering,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路暫時性錯誤，重跑可能成功
            Self::ApiError(_) => ErrorSeverity::Medium,
            Self::CatalogError { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            Self::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// True for catalog responses rejected because of the API token.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::CatalogError { status: 401 | 403, .. })
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::ApiError(_) => {
                "Check network connectivity and the catalog endpoint, then run again".to_string()
            }
            Self::CatalogError { .. } if self.is_auth_failure() => {
                "Set a valid API token via --api-token or DATAROBOT_API_TOKEN".to_string()
            }
            Self::CatalogError { status, .. } if *status >= 500 => {
                "The catalog service reported an internal error; try again later".to_string()
            }
            Self::CatalogError { .. } => "Verify the endpoint URL and dataset ID".to_string(),
            Self::DatasetNotFound { .. } => {
                "Check the dataset ID; it must exist in the AI Catalog and be visible to your account"
                    .to_string()
            }
            Self::CsvError(_) | Self::SerializationError(_) => {
                "Make sure the dataset has the columns CustomerID, Age, Location, Tenure, NumProducts, CrossSell_Motor, CrossSell_Haushalt, Storno"
                    .to_string()
            }
            Self::EmptyDataset => "Upload a dataset with at least one customer row".to_string(),
            Self::DuplicateCustomerId { .. } => {
                "Deduplicate the dataset so each CustomerID appears once".to_string()
            }
            Self::CustomerNotFound { .. } => {
                "Pick one of the customer IDs listed in the dataset".to_string()
            }
            Self::SelectionError { .. } => "Enter a listed number or customer ID".to_string(),
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => {
                "Review the command line flags or configuration file".to_string()
            }
            Self::MissingConfigError { field } => format!("Provide a value for '{}'", field),
            Self::ChartError { .. } => "Check chart dimensions in the configuration".to_string(),
            Self::IoError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ApiError(_) => "Could not reach the dataset catalog".to_string(),
            Self::CatalogError { .. } if self.is_auth_failure() => {
                "The dataset catalog rejected the API token".to_string()
            }
            Self::CatalogError { status, .. } => {
                format!("The dataset catalog answered with HTTP {}", status)
            }
            Self::DatasetNotFound { dataset_id } => {
                format!("Dataset {} does not exist", dataset_id)
            }
            Self::CsvError(_) => "The dataset could not be read as customer records".to_string(),
            Self::CustomerNotFound { customer_id } => {
                format!("Customer {} is not in the dataset", customer_id)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
