//! Environment-sourced application configuration.
//!
//! Read once at process start and passed in explicitly, so components can be
//! constructed in tests without mutating the environment.

use std::env;
use std::fmt;

/// Default analysis model identifier.
pub const DEFAULT_MODEL: &str = "prebuilt-layout";

/// Default JetStream stream holding published records.
pub const DEFAULT_STREAM: &str = "RECORDS";

/// Default queue (subject suffix) records are published to.
pub const DEFAULT_QUEUE_NAME: &str = "survey-ocr";

/// Error type for configuration loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingVar(&'static str),
    InvalidVar { var: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingVar(var) => {
                write!(f, "Missing required environment variable: {}", var)
            }
            ConfigError::InvalidVar { var, reason } => {
                write!(f, "Invalid environment variable {}: {}", var, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Connection settings for the document-analysis service.
#[derive(Debug, Clone)]
pub struct DocIntelConfig {
    /// Service base endpoint, e.g. `https://myresource.cognitiveservices.azure.com`
    pub endpoint: String,
    /// Subscription key sent on every request
    pub key: String,
    /// Analysis model identifier
    pub model: String,
    /// Delay between operation-status polls, in milliseconds
    pub poll_interval_ms: u64,
    /// Maximum number of operation-status polls before giving up
    pub max_polls: u64,
}

/// Connection settings for the record queue.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    pub url: String,
    /// Optional auth token for the queue server
    pub token: Option<String>,
    pub stream_name: String,
    /// Queue name, used as the publish subject suffix
    pub queue_name: String,
}

impl DocIntelConfig {
    /// Load analysis-service settings from the environment.
    ///
    /// Required: `DOC_INTELLIGENCE_ENDPOINT`, `DOC_INTELLIGENCE_KEY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            endpoint: require("DOC_INTELLIGENCE_ENDPOINT")?,
            key: require("DOC_INTELLIGENCE_KEY")?,
            model: env::var("DOC_INTELLIGENCE_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            poll_interval_ms: optional_u64("DOC_INTELLIGENCE_POLL_MS", 1_000)?,
            max_polls: optional_u64("DOC_INTELLIGENCE_MAX_POLLS", 120)?,
        })
    }
}

impl QueueConfig {
    /// Load queue settings from the environment.
    ///
    /// Required: `NATS_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: require("NATS_URL")?,
            token: env::var("NATS_TOKEN").ok(),
            stream_name: env::var("NATS_STREAM").unwrap_or_else(|_| DEFAULT_STREAM.to_string()),
            queue_name: env::var("QUEUE_NAME")
                .unwrap_or_else(|_| DEFAULT_QUEUE_NAME.to_string()),
        })
    }
}

/// Full application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub docintel: DocIntelConfig,
    pub queue: QueueConfig,
}

impl AppConfig {
    /// Load the full configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            docintel: DocIntelConfig::from_env()?,
            queue: QueueConfig::from_env()?,
        })
    }
}

fn require(var: &'static str) -> Result<String, ConfigError> {
    env::var(var).map_err(|_| ConfigError::MissingVar(var))
}

fn optional_u64(var: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(var) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar {
            var,
            reason: format!("expected an integer, got '{}'", raw),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docintel_from_env_fails_fast_on_missing_endpoint() {
        // Endpoint is checked first, so the error names it even when other
        // required variables are also absent
        env::remove_var("DOC_INTELLIGENCE_ENDPOINT");

        let err = DocIntelConfig::from_env().unwrap_err();

        assert_eq!(err, ConfigError::MissingVar("DOC_INTELLIGENCE_ENDPOINT"));
        assert!(err.to_string().contains("DOC_INTELLIGENCE_ENDPOINT"));
    }

    #[test]
    fn test_queue_from_env_fails_fast_on_missing_url() {
        env::remove_var("NATS_URL");

        let err = QueueConfig::from_env().unwrap_err();

        assert_eq!(err, ConfigError::MissingVar("NATS_URL"));
    }

    #[test]
    fn test_missing_var_names_the_variable() {
        let err = ConfigError::MissingVar("DOC_INTELLIGENCE_ENDPOINT");

        assert!(err.to_string().contains("DOC_INTELLIGENCE_ENDPOINT"));
    }

    #[test]
    fn test_invalid_var_carries_reason() {
        let err = ConfigError::InvalidVar {
            var: "DOC_INTELLIGENCE_POLL_MS",
            reason: "expected an integer, got 'soon'".to_string(),
        };

        assert!(err.to_string().contains("soon"));
    }
}
