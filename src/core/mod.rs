pub mod engine;
pub mod pipeline;
pub mod projection;
pub mod session;

pub use crate::domain::model::{CustomerId, CustomerRecord, CustomerTable};
pub use crate::domain::ports::{ConfigProvider, CustomerSelector, DatasetSource, Pipeline, Storage};
pub use crate::utils::error::Result;
