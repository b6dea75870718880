pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{LocalStorage, TomlConfig};

pub use crate::core::{
    engine::{FinderEngine, SearchReport},
    extractor::extract_records,
    pipeline::SearchPipeline,
    prompt::build_prompt,
};
pub use crate::domain::model::{
    CompanyRecord, CompanySize, ExportFormat, SearchFilters, SearchOutcome,
};
pub use crate::utils::error::{FinderError, Result};
