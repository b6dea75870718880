use crate::domain::model::{ExportFormat, SearchFilters, SearchOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    /// `None` when no credential was supplied.
    fn api_key(&self) -> Option<&str>;
    fn model(&self) -> &str;
    fn reasoning_enabled(&self) -> bool;
    fn timeout_seconds(&self) -> u64;
    fn max_tokens(&self) -> u32;
    fn temperature(&self) -> f32;
    fn site_url(&self) -> &str;
    fn app_title(&self) -> &str;
    fn search_filters(&self) -> SearchFilters;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[ExportFormat];
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Sends the search to the completion API and returns the assistant text.
    async fn extract(&self) -> Result<String>;
    async fn transform(&self, raw_output: String) -> Result<SearchOutcome>;
    /// Exports the records, returning the written file paths.
    async fn load(&self, outcome: &SearchOutcome) -> Result<Vec<String>>;
}
