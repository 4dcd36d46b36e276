//! Configuration module for the Smart Ping backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_COMPLETION_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_COMPLETION_MODEL: &str = "qwen/qwen3-235b-a22b-07-25:free";
pub const DEFAULT_SITE_URL: &str = "https://smart-ping-app.com";
pub const DEFAULT_SITE_TITLE: &str = "Smart Ping";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Settings for the outbound chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Base URL; `/chat/completions` is appended
    pub base_url: String,
    /// Bearer credential
    pub api_key: Option<String>,
    /// Model identifier sent with every request
    pub model: String,
    /// Value of the `HTTP-Referer` header
    pub site_url: String,
    /// Value of the `X-Title` header
    pub site_title: String,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Completion endpoint settings
    pub completion: CompletionConfig,
}

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid SMART_PING_HOST {value:?}: {source}")]
    InvalidHost {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error("invalid PORT {value:?}: {source}")]
    InvalidPort {
        value: String,
        source: std::num::ParseIntError,
    },

    #[error("invalid SMART_PING_LOG_FORMAT {0:?}, expected \"text\" or \"json\"")]
    InvalidLogFormat(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("SMART_PING_DB_PATH")
            .unwrap_or_else(|_| "./data/smart-ping.sqlite".to_string())
            .into();

        let host = env::var("SMART_PING_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let host: IpAddr = host
            .parse()
            .map_err(|source| ConfigError::InvalidHost {
                value: host.clone(),
                source,
            })?;

        let port = env::var("PORT").unwrap_or_else(|_| "5000".to_string());
        let port: u16 = port
            .parse()
            .map_err(|source| ConfigError::InvalidPort {
                value: port.clone(),
                source,
            })?;

        let log_level = env::var("SMART_PING_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_format = match env::var("SMART_PING_LOG_FORMAT") {
            Ok(value) => parse_log_format(&value)?,
            Err(_) => LogFormat::Text,
        };

        let completion = CompletionConfig {
            base_url: env::var("OPENROUTER_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_COMPLETION_BASE_URL.to_string()),
            api_key: env::var("OPENROUTER_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            model: env::var("SMART_PING_COMPLETION_MODEL")
                .unwrap_or_else(|_| DEFAULT_COMPLETION_MODEL.to_string()),
            site_url: env::var("SMART_PING_SITE_URL")
                .unwrap_or_else(|_| DEFAULT_SITE_URL.to_string()),
            site_title: env::var("SMART_PING_SITE_TITLE")
                .unwrap_or_else(|_| DEFAULT_SITE_TITLE.to_string()),
        };

        Ok(Self {
            db_path,
            bind_addr: SocketAddr::new(host, port),
            log_level,
            log_format,
            completion,
        })
    }
}

fn parse_log_format(value: &str) -> Result<LogFormat, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "text" | "" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        _ => Err(ConfigError::InvalidLogFormat(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 10] = [
        "SMART_PING_DB_PATH",
        "SMART_PING_HOST",
        "PORT",
        "SMART_PING_LOG_LEVEL",
        "SMART_PING_LOG_FORMAT",
        "OPENROUTER_BASE_URL",
        "OPENROUTER_API_KEY",
        "SMART_PING_COMPLETION_MODEL",
        "SMART_PING_SITE_URL",
        "SMART_PING_SITE_TITLE",
    ];

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        for var in VARS {
            env::remove_var(var);
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.db_path, PathBuf::from("./data/smart-ping.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:5000");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.completion.base_url, DEFAULT_COMPLETION_BASE_URL);
        assert!(config.completion.api_key.is_none());
        assert_eq!(config.completion.model, DEFAULT_COMPLETION_MODEL);
        assert_eq!(config.completion.site_url, DEFAULT_SITE_URL);
        assert_eq!(config.completion.site_title, DEFAULT_SITE_TITLE);
    }

    #[test]
    fn test_parse_log_format() {
        assert_eq!(parse_log_format("json").unwrap(), LogFormat::Json);
        assert_eq!(parse_log_format("TEXT").unwrap(), LogFormat::Text);
        assert!(matches!(
            parse_log_format("yaml"),
            Err(ConfigError::InvalidLogFormat(_))
        ));
    }
}
