// Adapters layer: concrete implementations for external systems (catalog, files, user input).

pub mod catalog;
pub mod csv_source;
pub mod selector;

use crate::config::cli::LocalStorage;
use crate::domain::ports::DatasetSource;
use catalog::CatalogSource;
use csv_source::CsvFileSource;
use std::collections::HashMap;

/// Resolved dataset location, produced by a validated config.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceSettings {
    Catalog {
        endpoint: String,
        api_token: String,
        dataset_id: String,
        timeout_seconds: Option<u64>,
        headers: HashMap<String, String>,
    },
    CsvFile {
        path: String,
    },
}

pub fn build_source(settings: &SourceSettings) -> Box<dyn DatasetSource> {
    match settings {
        SourceSettings::Catalog {
            endpoint,
            api_token,
            dataset_id,
            timeout_seconds,
            headers,
        } => Box::new(
            CatalogSource::new(endpoint.clone(), api_token.clone(), dataset_id.clone())
                .with_timeout(*timeout_seconds)
                .with_headers(headers.clone()),
        ),
        SourceSettings::CsvFile { path } => {
            Box::new(CsvFileSource::new(LocalStorage::new(String::new()), path.clone()))
        }
    }
}
