//! Configuration management for the agent service.
//!
//! Configuration can be set via environment variables:
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//! - `API_KEY` - Optional. Key expected in the `x-api-key` header. Defaults to `development-key`.
//! - `LOG_LEVEL` - Optional. Default log level when `RUST_LOG` is unset. Defaults to `info`.
//! - `LOG_FORMAT` - Optional. `pretty` or `json`. Defaults to `pretty`.
//! - `OPENAI_API_KEY` - Optional. Enables the LLM-backed agents.
//! - `OPENAI_BASE_URL` - Optional. Defaults to `https://api.openai.com/v1`.
//! - `OPENAI_MODEL` - Optional. Defaults to `gpt-4`.
//! - `SUMMARY_MAX_LENGTH`, `SUMMARY_LANGUAGE`, `SUMMARY_FORMAT`, `SUMMARY_STYLE`,
//!   `SUMMARY_FOCUS_AREAS` - Optional. Process-wide summary defaults.

use thiserror::Error;

use crate::agents::summary::{Language, SummaryDefaults, SummaryFormat, SummaryStyle};
use crate::llm::DEFAULT_OPENAI_BASE_URL;
use crate::logging::LogFormat;

/// API key accepted when `API_KEY` is not configured.
pub const DEVELOPMENT_API_KEY: &str = "development-key";

/// Model used when `OPENAI_MODEL` is not configured.
pub const DEFAULT_MODEL: &str = "gpt-4";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Completion service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    /// Bearer token for the completion API
    pub api_key: String,

    /// API base URL (without `/chat/completions`)
    pub base_url: String,

    /// Model identifier
    pub model: String,
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Key expected in the `x-api-key` header
    pub api_key: String,

    /// Default log level
    pub log_level: String,

    pub log_format: LogFormat,

    /// Completion service (None disables the LLM-backed agents)
    pub llm: Option<LlmConfig>,

    /// Process-wide summary defaults
    pub summary: SummaryDefaults,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a variable is set to something unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = var("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = var("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let api_key = var("API_KEY").unwrap_or_else(|| DEVELOPMENT_API_KEY.to_string());
        let log_level = var("LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        let log_format = var("LOG_FORMAT")
            .map(|v| v.parse::<LogFormat>())
            .transpose()
            .map_err(|e| ConfigError::InvalidValue("LOG_FORMAT".to_string(), e))?
            .unwrap_or_default();

        let llm = var("OPENAI_API_KEY").map(|api_key| LlmConfig {
            api_key,
            base_url: var("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            model: var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        });

        let summary = SummaryDefaults {
            max_length: parse_var(&var, "SUMMARY_MAX_LENGTH", |v| {
                v.parse::<usize>().map_err(|e| e.to_string())
            })?,
            language: parse_var(&var, "SUMMARY_LANGUAGE", |v| v.parse::<Language>())?,
            format: parse_var(&var, "SUMMARY_FORMAT", |v| v.parse::<SummaryFormat>())?,
            style: parse_var(&var, "SUMMARY_STYLE", |v| v.parse::<SummaryStyle>())?,
            focus_areas: var("SUMMARY_FOCUS_AREAS").map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            }),
        };

        Ok(Self {
            host,
            port,
            api_key,
            log_level,
            log_format,
            llm,
            summary,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            api_key: api_key.into(),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            llm: None,
            summary: SummaryDefaults::default(),
        }
    }

    /// Enable the LLM-backed agents.
    pub fn with_llm(mut self, llm: LlmConfig) -> Self {
        self.llm = Some(llm);
        self
    }

    /// `host:port` bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T, V, P>(var: &V, name: &str, parse: P) -> Result<Option<T>, ConfigError>
where
    V: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Result<T, String>,
{
    var(name)
        .map(|v| parse(v.trim()))
        .transpose()
        .map_err(|e| ConfigError::InvalidValue(name.to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.api_key, DEVELOPMENT_API_KEY);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.llm.is_none());
        assert_eq!(config.summary, SummaryDefaults::default());
    }

    #[test]
    fn reads_llm_and_summary_settings() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("API_KEY", "test-key-123"),
            ("OPENAI_API_KEY", "sk-abc"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
            ("SUMMARY_MAX_LENGTH", "500"),
            ("SUMMARY_LANGUAGE", "en"),
            ("SUMMARY_FORMAT", "bullets"),
            ("SUMMARY_STYLE", "casual"),
            ("SUMMARY_FOCUS_AREAS", "cost, risk,,"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.api_key, "test-key-123");
        let llm = config.llm.unwrap();
        assert_eq!(llm.api_key, "sk-abc");
        assert_eq!(llm.model, "gpt-4o-mini");
        assert_eq!(llm.base_url, DEFAULT_OPENAI_BASE_URL);

        assert_eq!(config.summary.max_length, Some(500));
        assert_eq!(config.summary.language, Some(Language::English));
        assert_eq!(config.summary.format, Some(SummaryFormat::Bullets));
        assert_eq!(config.summary.style, Some(SummaryStyle::Casual));
        assert_eq!(
            config.summary.focus_areas,
            Some(vec!["cost".to_string(), "risk".to_string()])
        );
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config =
            Config::from_lookup(lookup(&[("API_KEY", "  "), ("OPENAI_API_KEY", "")])).unwrap();
        assert_eq!(config.api_key, DEVELOPMENT_API_KEY);
        assert!(config.llm.is_none());
    }

    #[test]
    fn rejects_invalid_values() {
        let err = Config::from_lookup(lookup(&[("PORT", "not-a-port")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref name, _) if name == "PORT"));

        let err = Config::from_lookup(lookup(&[("SUMMARY_LANGUAGE", "fr")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue(ref name, _) if name == "SUMMARY_LANGUAGE"
        ));

        let err = Config::from_lookup(lookup(&[("LOG_FORMAT", "xml")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref name, _) if name == "LOG_FORMAT"));
    }
}
