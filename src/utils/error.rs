use thiserror::Error;

/// Longest slice of an upstream error body kept for reporting.
pub const ERROR_BODY_EXCERPT_CHARS: usize = 500;

#[derive(Error, Debug)]
pub enum FinderError {
    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Network/timeout error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Completion API error: {status} - {body}")]
    UpstreamError { status: u16, body: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Unexpected error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Upstream,
    Export,
    Unexpected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FinderError {
    /// Builds an upstream error, keeping only the head of the response body.
    pub fn upstream(status: u16, body: &str) -> Self {
        FinderError::UpstreamError {
            status,
            body: body.chars().take(ERROR_BODY_EXCERPT_CHARS).collect(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            FinderError::MissingConfigError { .. }
            | FinderError::InvalidConfigValueError { .. }
            | FinderError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            FinderError::NetworkError(_) => ErrorCategory::Network,
            FinderError::UpstreamError { .. } => ErrorCategory::Upstream,
            FinderError::CsvError(_) | FinderError::ZipError(_) | FinderError::IoError(_) => {
                ErrorCategory::Export
            }
            FinderError::SerializationError(_) | FinderError::ProcessingError { .. } => {
                ErrorCategory::Unexpected
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Upstream => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Export => ErrorSeverity::High,
            ErrorCategory::Unexpected => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            FinderError::MissingConfigError { field } if field == "api_key" => {
                "Pass --api-key or set OPENROUTER_API_KEY".to_string()
            }
            FinderError::MissingConfigError { field } => {
                format!("Provide a value for '{}'", field)
            }
            FinderError::InvalidConfigValueError { field, .. } => {
                format!("Check the value of '{}'", field)
            }
            FinderError::ConfigValidationError { .. } => {
                "Make sure the config file exists and is valid TOML".to_string()
            }
            FinderError::NetworkError(e) if e.is_timeout() => {
                "The search timed out; lower --max-results or raise the request timeout".to_string()
            }
            FinderError::NetworkError(_) => {
                "Check your network connection and the API endpoint".to_string()
            }
            FinderError::UpstreamError { status: 401, .. }
            | FinderError::UpstreamError { status: 403, .. } => {
                "The API key was rejected; check that it is valid".to_string()
            }
            FinderError::UpstreamError { status: 429, .. } => {
                "The API is rate limiting requests; wait and search again".to_string()
            }
            FinderError::UpstreamError { .. } => {
                "The completion API rejected the request; try another model".to_string()
            }
            FinderError::CsvError(_) | FinderError::ZipError(_) | FinderError::IoError(_) => {
                "Check that the output directory is writable".to_string()
            }
            FinderError::SerializationError(_) | FinderError::ProcessingError { .. } => {
                "Run again with --verbose and inspect the logs".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => self.to_string(),
            ErrorCategory::Upstream => self.to_string(),
            ErrorCategory::Export => format!("Could not export results: {}", self),
            ErrorCategory::Unexpected => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FinderError>;
