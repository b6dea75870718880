pub mod completion;
pub mod engine;
pub mod export;
pub mod extractor;
pub mod pipeline;
pub mod prompt;

pub use crate::domain::model::{CompanyRecord, SearchFilters, SearchOutcome};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
