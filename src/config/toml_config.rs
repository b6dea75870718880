use crate::core::completion::{
    DEFAULT_APP_TITLE, DEFAULT_ENDPOINT, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_SITE_URL,
    DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECONDS,
};
use crate::core::ConfigProvider;
use crate::domain::model::{ExportFormat, SearchFilters, MAX_RESULTS_LIMIT};
use crate::utils::error::{FinderError, Result};
use crate::utils::validation::{
    validate_initial, validate_non_empty_string, validate_path, validate_range, validate_url,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub search: SearchFilters,
    #[serde(default)]
    pub output: OutputConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub reasoning: bool,
    pub timeout_seconds: u64,
    pub max_tokens: u32,
    pub temperature: f32,
    pub site_url: String,
    pub app_title: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            reasoning: true,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            site_url: DEFAULT_SITE_URL.to_string(),
            app_title: DEFAULT_APP_TITLE.to_string(),
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("reasoning", &self.reasoning)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("site_url", &self.site_url)
            .field("app_title", &self.app_title)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub output_path: String,
    pub output_formats: Vec<ExportFormat>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
            output_formats: vec![ExportFormat::Csv, ExportFormat::Xlsx],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FinderError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FinderError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` placeholders with environment values. Unset variables
    /// stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| FinderError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("api.endpoint", &self.api.endpoint)?;
        validate_non_empty_string("api.model", &self.api.model)?;
        validate_range("api.timeout_seconds", self.api.timeout_seconds, 1, 600)?;
        validate_range("api.temperature", self.api.temperature, 0.0, 2.0)?;
        validate_range("search.max_results", self.search.max_results, 1, MAX_RESULTS_LIMIT)?;
        validate_initial("search.starts_with", self.search.starts_with)?;
        validate_path("output.output_path", &self.output.output_path)?;
        Ok(())
    }

    pub fn verbose_logging(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn api_endpoint(&self) -> &str {
        &self.api.endpoint
    }

    fn api_key(&self) -> Option<&str> {
        // an unset ${VAR} survives substitution and is not a credential
        self.api
            .api_key
            .as_deref()
            .filter(|key| !key.starts_with("${"))
    }

    fn model(&self) -> &str {
        &self.api.model
    }

    fn reasoning_enabled(&self) -> bool {
        self.api.reasoning
    }

    fn timeout_seconds(&self) -> u64 {
        self.api.timeout_seconds
    }

    fn max_tokens(&self) -> u32 {
        self.api.max_tokens
    }

    fn temperature(&self) -> f32 {
        self.api.temperature
    }

    fn site_url(&self) -> &str {
        &self.api.site_url
    }

    fn app_title(&self) -> &str {
        &self.api.app_title
    }

    fn search_filters(&self) -> SearchFilters {
        let mut filters = self.search.clone();
        filters.starts_with = filters.starts_with.map(|c| c.to_ascii_uppercase());
        filters
    }

    fn output_path(&self) -> &str {
        &self.output.output_path
    }

    fn output_formats(&self) -> &[ExportFormat] {
        &self.output.output_formats
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CompanySize;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[api]
endpoint = "https://openrouter.ai/api/v1/chat/completions"
api_key = "sk-or-test"
model = "deepseek/deepseek-r1:online"
reasoning = false
timeout_seconds = 60

[search]
keywords = "solar pv, epc, renewable energy"
location = "Middle East"
size = "1,001-5,000"
starts_with = "b"
max_results = 75

[output]
output_path = "./results"
output_formats = ["xlsx"]

[logging]
verbose = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.api_key(), Some("sk-or-test"));
        assert_eq!(config.model(), "deepseek/deepseek-r1:online");
        assert!(!config.reasoning_enabled());
        assert_eq!(config.timeout_seconds(), 60);
        assert_eq!(config.max_tokens(), DEFAULT_MAX_TOKENS);

        let filters = config.search_filters();
        assert_eq!(filters.keywords, "solar pv, epc, renewable energy");
        assert_eq!(filters.size, CompanySize::Enterprise);
        assert_eq!(filters.starts_with, Some('B'));
        assert_eq!(filters.max_results, 75);

        assert_eq!(config.output_formats(), &[ExportFormat::Xlsx]);
        assert!(config.verbose_logging());
        assert!(!config.json_logging());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.api_endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(config.model(), DEFAULT_MODEL);
        assert!(config.reasoning_enabled());
        assert_eq!(config.api_key(), None);
        assert_eq!(config.search_filters(), SearchFilters::default());
        assert_eq!(config.output_path(), "./output");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_FINDER_API_KEY", "sk-from-env");

        let toml_content = r#"
[api]
api_key = "${TEST_FINDER_API_KEY}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_key(), Some("sk-from-env"));

        std::env::remove_var("TEST_FINDER_API_KEY");
    }

    #[test]
    fn test_unset_env_var_is_not_a_credential() {
        let toml_content = r#"
[api]
api_key = "${FINDER_TEST_UNSET_VARIABLE}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_config_validation() {
        let bad_endpoint = TomlConfig::from_toml_str("[api]\nendpoint = \"invalid-url\"\n").unwrap();
        assert!(bad_endpoint.validate().is_err());

        let bad_max = TomlConfig::from_toml_str("[search]\nmax_results = 500\n").unwrap();
        assert!(bad_max.validate().is_err());

        let bad_initial = TomlConfig::from_toml_str("[search]\nstarts_with = \"1\"\n").unwrap();
        assert!(bad_initial.validate().is_err());
    }

    #[test]
    fn test_blank_starts_with_means_any() {
        let config = TomlConfig::from_toml_str("[search]\nstarts_with = \"\"\n").unwrap();

        assert_eq!(config.search_filters().starts_with, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_values_fail_parsing() {
        assert!(TomlConfig::from_toml_str("[search]\nsize = \"huge\"\n").is_err());
        assert!(TomlConfig::from_toml_str("[output]\noutput_formats = [\"pdf\"]\n").is_err());
        assert!(TomlConfig::from_toml_str("[api\n").is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[search]
keywords = "logistics"
location = "Bangalore"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.search_filters().location, "Bangalore");
    }
}
