use crate::core::prompt::SYSTEM_PROMPT;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{FinderError, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat-v3.1:online";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 90;
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_SITE_URL: &str = "http://localhost:8501";
pub const DEFAULT_APP_TITLE: &str = "LinkedIn Company Finder";

/// Models offered by default. The `:online` suffix turns on web search.
pub const KNOWN_MODELS: [&str; 3] = [
    DEFAULT_MODEL,
    "deepseek/deepseek-r1:online",
    "openrouter/auto:online",
];

pub const WEB_SEARCH_SUFFIX: &str = ":online";

/// Connection settings for the completion API, resolved once per run.
#[derive(Clone)]
pub struct ApiSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub reasoning: bool,
    pub timeout: Duration,
    pub max_tokens: u32,
    pub temperature: f32,
    pub site_url: String,
    pub app_title: String,
}

impl ApiSettings {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            endpoint: config.api_endpoint().to_string(),
            api_key: config
                .api_key()
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(str::to_string),
            model: config.model().to_string(),
            reasoning: config.reasoning_enabled(),
            timeout: Duration::from_secs(config.timeout_seconds()),
            max_tokens: config.max_tokens(),
            temperature: config.temperature(),
            site_url: config.site_url().to_string(),
            app_title: config.app_title().to_string(),
        }
    }

    pub fn web_search_enabled(&self) -> bool {
        self.model.ends_with(WEB_SEARCH_SUFFIX)
    }
}

impl fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiSettings")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("reasoning", &self.reasoning)
            .field("timeout", &self.timeout)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("site_url", &self.site_url)
            .field("app_title", &self.app_title)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningConfig {
    pub effort: String,
    pub enabled: bool,
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            effort: "medium".to_string(),
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<ReasoningConfig>,
}

/// Request body for one search. Web search is selected through the model
/// name, so no plugin field is sent.
pub fn build_chat_request(settings: &ApiSettings, user_prompt: &str) -> ChatRequest {
    ChatRequest {
        model: settings.model.clone(),
        messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(user_prompt)],
        max_tokens: settings.max_tokens,
        temperature: settings.temperature,
        reasoning: settings.reasoning.then(ReasoningConfig::default),
    }
}

type ContentStrategy = fn(&Value) -> Option<&str>;

fn message_content(body: &Value) -> Option<&str> {
    body.pointer("/choices/0/message/content")?.as_str()
}

fn messages_content(body: &Value) -> Option<&str> {
    body.pointer("/choices/0/messages/0/content")?.as_str()
}

/// Response shapes the assistant text may arrive in, tried in order.
const CONTENT_STRATEGIES: [ContentStrategy; 2] = [message_content, messages_content];

/// Finds the assistant reply in a completion response body, or `""`.
pub fn extract_content(body: &Value) -> String {
    CONTENT_STRATEGIES
        .iter()
        .find_map(|strategy| strategy(body))
        .unwrap_or_default()
        .to_string()
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| FinderError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: "Value contains characters not allowed in an HTTP header".to_string(),
    })
}

pub struct CompletionClient {
    http: Client,
    settings: ApiSettings,
}

impl CompletionClient {
    pub fn new(settings: ApiSettings) -> Result<Self> {
        let http = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self { http, settings })
    }

    fn headers(&self, api_key: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|_| {
            FinderError::InvalidConfigValueError {
                field: "api_key".to_string(),
                value: "<redacted>".to_string(),
                reason: "API key contains characters not allowed in a header".to_string(),
            }
        })?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("HTTP-Referer", header_value("site_url", &self.settings.site_url)?);
        headers.insert("X-Title", header_value("app_title", &self.settings.app_title)?);

        Ok(headers)
    }

    /// Sends one search prompt and returns the assistant text. No retries.
    pub async fn complete(&self, user_prompt: &str) -> Result<String> {
        let api_key =
            self.settings
                .api_key
                .as_deref()
                .ok_or_else(|| FinderError::MissingConfigError {
                    field: "api_key".to_string(),
                })?;

        let request = build_chat_request(&self.settings, user_prompt);
        tracing::debug!(
            model = %request.model,
            reasoning = request.reasoning.is_some(),
            "Sending completion request to {}",
            self.settings.endpoint
        );

        let response = self
            .http
            .post(&self.settings.endpoint)
            .headers(self.headers(api_key)?)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Completion API response status: {}", status);
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FinderError::upstream(status.as_u16(), &body));
        }

        let json: Value = serde_json::from_str(&body)?;
        Ok(extract_content(&json))
    }
}
