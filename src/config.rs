//! Centralized configuration management for edinet-harvester

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use anyhow::{Result, Context};

use crate::edinet::{EdinetApi, EdinetError};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory downloaded documents are written to
    pub output_dir: PathBuf,
    /// EDINET API key (subscription key)
    pub edinet_api_key: Option<String>,
    /// Number of days covered by a listing window
    pub duration_days: u32,
    /// Rate limiting configuration
    pub rate_limits: RateLimits,
    /// HTTP client configuration
    pub http: HttpConfig,
    /// EDINET endpoint configuration
    pub endpoints: Endpoints,
}

/// Rate limiting configuration for the EDINET API
#[derive(Debug, Clone)]
pub struct RateLimits {
    /// Delay between document index calls (milliseconds)
    pub edinet_api_delay_ms: u64,
    /// Delay between document downloads (milliseconds)
    pub edinet_download_delay_ms: u64,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

/// Where the EDINET endpoints live and how the subscription key is sent
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// Base URL of the document index endpoint
    pub index_base_url: String,
    /// Base URL of the document content endpoint
    pub content_base_url: String,
    /// How the API key is attached to requests
    pub api_key_placement: ApiKeyPlacement,
}

/// Transport of the subscription key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyPlacement {
    /// `Subscription-Key` query parameter
    Query,
    /// `Ocp-Apim-Subscription-Key` header
    Header,
}

impl FromStr for ApiKeyPlacement {
    type Err = EdinetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "query" => Ok(ApiKeyPlacement::Query),
            "header" => Ok(ApiKeyPlacement::Header),
            other => Err(EdinetError::Config(format!(
                "Unsupported API key placement: {}. Supported values: query, header",
                other
            ))),
        }
    }
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            edinet_api_delay_ms: 100,
            edinet_download_delay_ms: 200,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: "edinet-harvester/0.1.0".to_string(),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            index_base_url: EdinetApi::INDEX_BASE_URL.to_string(),
            content_base_url: EdinetApi::CONTENT_BASE_URL.to_string(),
            api_key_placement: ApiKeyPlacement::Query,
        }
    }
}

impl Config {
    /// Configuration with defaults for everything but the API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            output_dir: default_output_dir(),
            edinet_api_key: Some(api_key.into()),
            duration_days: 365,
            rate_limits: RateLimits::default(),
            http: HttpConfig::default(),
            endpoints: Endpoints::default(),
        }
    }

    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let output_dir = std::env::var("EDINET_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_output_dir());

        let edinet_api_key = std::env::var("EDINET_API_KEY").ok();

        let rate_limits = RateLimits {
            edinet_api_delay_ms: parse_env_var("EDINET_API_DELAY_MS")?.unwrap_or(100),
            edinet_download_delay_ms: parse_env_var("EDINET_DOWNLOAD_DELAY_MS")?.unwrap_or(200),
        };

        let http = HttpConfig {
            timeout_seconds: parse_env_var("EDINET_HTTP_TIMEOUT_SECONDS")?.unwrap_or(30),
            user_agent: std::env::var("EDINET_USER_AGENT")
                .unwrap_or_else(|_| "edinet-harvester/0.1.0".to_string()),
        };

        let endpoints = Endpoints {
            index_base_url: std::env::var("EDINET_INDEX_BASE_URL")
                .unwrap_or_else(|_| EdinetApi::INDEX_BASE_URL.to_string()),
            content_base_url: std::env::var("EDINET_CONTENT_BASE_URL")
                .unwrap_or_else(|_| EdinetApi::CONTENT_BASE_URL.to_string()),
            api_key_placement: parse_env_var("EDINET_API_KEY_PLACEMENT")?
                .unwrap_or(ApiKeyPlacement::Query),
        };

        Ok(Config {
            output_dir,
            edinet_api_key,
            duration_days: parse_env_var("EDINET_DURATION_DAYS")?.unwrap_or(365),
            rate_limits,
            http,
            endpoints,
        })
    }

    /// The API key, rejecting a missing or blank value
    pub fn api_key(&self) -> Result<&str, EdinetError> {
        match self.edinet_api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(EdinetError::MissingApiKey),
        }
    }

    /// Get EDINET index call delay as Duration
    pub fn edinet_api_delay(&self) -> Duration {
        Duration::from_millis(self.rate_limits.edinet_api_delay_ms)
    }

    /// Get EDINET download delay as Duration
    pub fn edinet_download_delay(&self) -> Duration {
        Duration::from_millis(self.rate_limits.edinet_download_delay_ms)
    }

    /// Get HTTP timeout as Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.api_key()?;

        if self.http.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("HTTP timeout must be at least one second"));
        }

        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("Cannot create output directory: {}", self.output_dir.display()))?;

        Ok(())
    }
}

/// `./output/<YYYYmmddHHMMSS>`, one folder per run
fn default_output_dir() -> PathBuf {
    PathBuf::from("./output").join(chrono::Local::now().format("%Y%m%d%H%M%S").to_string())
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config = Config::new("key");
        assert_eq!(config.duration_days, 365);
        assert_eq!(config.rate_limits.edinet_api_delay_ms, 100);
        assert_eq!(config.http.timeout_seconds, 30);
        assert_eq!(config.endpoints.api_key_placement, ApiKeyPlacement::Query);
        assert!(config.output_dir.starts_with("./output"));
    }

    #[test]
    fn test_blank_api_key_is_rejected() {
        let mut config = Config::new("   ");
        assert!(matches!(config.api_key(), Err(EdinetError::MissingApiKey)));

        config.edinet_api_key = None;
        assert!(matches!(config.api_key(), Err(EdinetError::MissingApiKey)));
    }

    #[test]
    fn test_config_validation_creates_output_dir() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::new("key");
        config.output_dir = temp_dir.path().join("nested").join("out");

        config.validate().unwrap();
        assert!(config.output_dir.is_dir());
    }

    #[test]
    fn test_validation_fails_without_key() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::new("");
        config.output_dir = temp_dir.path().to_path_buf();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_placement_parsing() {
        assert_eq!("Header".parse::<ApiKeyPlacement>().unwrap(), ApiKeyPlacement::Header);
        assert_eq!("query".parse::<ApiKeyPlacement>().unwrap(), ApiKeyPlacement::Query);
        assert!("cookie".parse::<ApiKeyPlacement>().is_err());
    }
}
