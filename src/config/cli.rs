use crate::core::completion::{
    DEFAULT_APP_TITLE, DEFAULT_ENDPOINT, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_SITE_URL,
    DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECONDS,
};
use crate::core::ConfigProvider;
use crate::domain::model::{
    CompanySize, ExportFormat, SearchFilters, DEFAULT_MAX_RESULTS, MAX_RESULTS_LIMIT,
};
use crate::utils::error::Result;
use crate::utils::validation::{
    parse_initial, validate_initial, validate_non_empty_string, validate_path, validate_range,
    validate_url, Initial, Validate,
};
use clap::Parser;
use std::fmt;

#[derive(Clone, Parser)]
#[command(name = "company-finder")]
#[command(about = "Find public LinkedIn company pages through a web-search enabled LLM")]
pub struct CliConfig {
    /// Keywords, comma separated; any of them may match
    #[arg(long, default_value = "")]
    pub keywords: String,

    /// Location words to prefer (city, region or country)
    #[arg(long, default_value = "")]
    pub location: String,

    /// Company size bucket, e.g. "11-50" or "10,001+"
    #[arg(long, default_value = "any")]
    pub size: CompanySize,

    /// Only companies whose name starts with this letter
    #[arg(long, value_parser = parse_initial, default_value = "")]
    pub starts_with: Initial,

    #[arg(long, default_value_t = DEFAULT_MAX_RESULTS,
        value_parser = clap::value_parser!(u32).range(1..=MAX_RESULTS_LIMIT as i64))]
    pub max_results: u32,

    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Request reasoning tokens from models that support them
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub reasoning: bool,

    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub api_endpoint: String,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "csv,xlsx")]
    pub formats: Vec<ExportFormat>,

    /// Print the raw model output after the results
    #[arg(long)]
    pub show_raw: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CliConfig")
            .field("keywords", &self.keywords)
            .field("location", &self.location)
            .field("size", &self.size)
            .field("starts_with", &self.starts_with)
            .field("max_results", &self.max_results)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("reasoning", &self.reasoning)
            .field("api_endpoint", &self.api_endpoint)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("output_path", &self.output_path)
            .field("formats", &self.formats)
            .finish()
    }
}

impl ConfigProvider for CliConfig {
    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn reasoning_enabled(&self) -> bool {
        self.reasoning
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn max_tokens(&self) -> u32 {
        DEFAULT_MAX_TOKENS
    }

    fn temperature(&self) -> f32 {
        DEFAULT_TEMPERATURE
    }

    fn site_url(&self) -> &str {
        DEFAULT_SITE_URL
    }

    fn app_title(&self) -> &str {
        DEFAULT_APP_TITLE
    }

    fn search_filters(&self) -> SearchFilters {
        SearchFilters {
            keywords: self.keywords.clone(),
            location: self.location.clone(),
            size: self.size,
            starts_with: self.starts_with,
            max_results: self.max_results,
        }
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[ExportFormat] {
        &self.formats
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_endpoint", &self.api_endpoint)?;
        validate_non_empty_string("model", &self.model)?;
        validate_range("max_results", self.max_results, 1, MAX_RESULTS_LIMIT)?;
        validate_range("timeout_seconds", self.timeout_seconds, 1, 600)?;
        validate_initial("starts_with", self.starts_with)?;
        validate_path("output_path", &self.output_path)?;
        Ok(())
    }
}
