pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{build_source, SourceSettings};
pub use config::cli::LocalStorage;
pub use core::{engine::DashboardEngine, pipeline::DashboardPipeline, session::Session};
pub use utils::error::{DashboardError, Result};
