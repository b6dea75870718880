use crate::core::completion::{ApiSettings, CompletionClient, KNOWN_MODELS};
use crate::core::extractor::extract_records;
use crate::core::export;
use crate::core::prompt::build_prompt;
use crate::core::{ConfigProvider, Pipeline, SearchOutcome, Storage};
use crate::utils::error::Result;
use std::path::Path;

/// One search against the completion API, exported through `Storage`.
pub struct SearchPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: CompletionClient,
}

impl<S: Storage, C: ConfigProvider> SearchPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let settings = ApiSettings::from_config(&config);
        if !KNOWN_MODELS.contains(&settings.model.as_str()) {
            tracing::info!("Using custom model '{}'", settings.model);
        }
        if !settings.web_search_enabled() {
            tracing::warn!(
                "Model '{}' has no ':online' suffix; web search is not enabled",
                settings.model
            );
        }
        let client = CompletionClient::new(settings)?;

        Ok(Self {
            storage,
            config,
            client,
        })
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SearchPipeline<S, C> {
    async fn extract(&self) -> Result<String> {
        let filters = self.config.search_filters();
        let prompt = build_prompt(&filters);

        tracing::info!(
            "🔎 Searching up to {} companies with model {}",
            filters.max_results,
            self.config.model()
        );
        tracing::debug!("User prompt:\n{}", prompt);

        let content = self.client.complete(&prompt).await?;
        tracing::debug!("Model returned {} characters", content.len());
        Ok(content)
    }

    async fn transform(&self, raw_output: String) -> Result<SearchOutcome> {
        let records = extract_records(&raw_output);

        if records.is_empty() {
            tracing::warn!("No valid companies found in model output");
        } else {
            tracing::info!("✅ Found {} companies", records.len());
        }

        Ok(SearchOutcome {
            records,
            raw_output,
        })
    }

    async fn load(&self, outcome: &SearchOutcome) -> Result<Vec<String>> {
        let mut written = Vec::new();

        for format in self.config.output_formats() {
            let data = export::render(*format, &outcome.records)?;
            tracing::debug!("Writing {} ({} bytes)", format.file_name(), data.len());
            self.storage.write_file(format.file_name(), &data).await?;
            let location = Path::new(self.config.output_path()).join(format.file_name());
            written.push(location.display().to_string());
        }

        Ok(written)
    }
}
