use std::collections::BTreeMap;
use std::env;
use std::time::Duration;

use reqwest::Url;

use crate::error::{DatadogError, Result};

pub const DEFAULT_API_URL: &str = "https://api.datadoghq.com";

const API_KEY_ENV_VARS: &[&str] = &["DD_API_KEY", "DATADOG_API_KEY"];
const APP_KEY_ENV_VARS: &[&str] = &["DD_APP_KEY", "DATADOG_APP_KEY"];
const HOST_ENV_VARS: &[&str] = &["DATADOG_HOST", "DD_HOST"];

/// Retry behaviour of the HTTP client for 429 and 5xx responses.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRetryConfig {
    pub enabled: bool,
    /// Total time budget across all retries of one request.
    pub timeout: Duration,
    pub backoff_multiplier: f64,
    /// Wait before the first retry; later waits grow by `backoff_multiplier`.
    pub backoff_base: Duration,
    pub max_retries: u32,
}

impl Default for HttpRetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout: Duration::from_secs(60),
            backoff_multiplier: 2.0,
            backoff_base: Duration::from_secs(2),
            max_retries: 3,
        }
    }
}

impl HttpRetryConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub app_key: Option<String>,
    /// Must not end with `/api/`, e.g. `https://api.datadoghq.eu/`.
    pub api_url: Option<String>,
    /// Check the credentials against `/api/v1/validate` when configuring.
    pub validate: bool,
    pub http_retry: HttpRetryConfig,
    pub default_tags: BTreeMap<String, String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            app_key: None,
            api_url: None,
            validate: true,
            http_retry: HttpRetryConfig::default(),
            default_tags: BTreeMap::new(),
        }
    }
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>, app_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            app_key: Some(app_key.into()),
            ..Self::default()
        }
    }

    /// Build a configuration from `DD_*` / `DATADOG_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let defaults = HttpRetryConfig::default();

        let http_retry = HttpRetryConfig {
            enabled: env_bool("DD_HTTP_CLIENT_RETRY_ENABLED")?.unwrap_or(defaults.enabled),
            timeout: env_u64("DD_HTTP_CLIENT_RETRY_TIMEOUT")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            backoff_multiplier: env_u64("DD_HTTP_CLIENT_RETRY_BACKOFF_MULTIPLIER")?
                .map(|m| m as f64)
                .unwrap_or(defaults.backoff_multiplier),
            backoff_base: env_u64("DD_HTTP_CLIENT_RETRY_BACKOFF_BASE")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.backoff_base),
            max_retries: env_u64("DD_HTTP_CLIENT_RETRY_MAX_RETRIES")?
                .map(|n| {
                    u32::try_from(n).map_err(|_| {
                        DatadogError::ConfigError(format!(
                            "DD_HTTP_CLIENT_RETRY_MAX_RETRIES is out of range: {}",
                            n
                        ))
                    })
                })
                .transpose()?
                .unwrap_or(defaults.max_retries),
        };

        let default_tags = match env_first(&["DD_DEFAULT_TAGS"]) {
            Some(raw) => parse_default_tags(&raw)?,
            None => BTreeMap::new(),
        };

        Ok(Self {
            api_key: env_first(API_KEY_ENV_VARS),
            app_key: env_first(APP_KEY_ENV_VARS),
            api_url: env_first(HOST_ENV_VARS),
            validate: env_bool("DD_VALIDATE")?.unwrap_or(true),
            http_retry,
            default_tags,
        })
    }

    /// Base URL for API requests, without a trailing slash.
    pub fn base_url(&self) -> Result<String> {
        let raw = match self.api_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url,
            _ => return Ok(DEFAULT_API_URL.to_string()),
        };

        let parsed = Url::parse(raw)
            .map_err(|e| DatadogError::ConfigError(format!("invalid API URL '{}': {}", raw, e)))?;

        if parsed.host_str().is_none_or(str::is_empty) || parsed.scheme().is_empty() {
            return Err(DatadogError::ConfigError(format!(
                "API URL '{}' missing protocol or host",
                raw
            )));
        }

        let trimmed = raw.trim_end_matches('/');
        if trimmed.ends_with("/api") {
            return Err(DatadogError::ConfigError(format!(
                "API URL '{}' must not end with the /api/ path",
                raw
            )));
        }

        Ok(trimmed.to_string())
    }

    /// Credentials are mandatory unless validation is turned off.
    pub fn check_credentials(&self) -> Result<()> {
        if !self.validate {
            return Ok(());
        }

        let missing = |v: &Option<String>| v.as_deref().is_none_or(str::is_empty);
        if missing(&self.api_key) {
            return Err(DatadogError::ConfigError(
                "api_key is required unless validate is false (set DD_API_KEY)".to_string(),
            ));
        }
        if missing(&self.app_key) {
            return Err(DatadogError::ConfigError(
                "app_key is required unless validate is false (set DD_APP_KEY)".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parse `key:value,key2:value2`. A bare `key` maps to an empty value.
pub fn parse_default_tags(raw: &str) -> Result<BTreeMap<String, String>> {
    let mut tags = BTreeMap::new();

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (key, value) = entry.split_once(':').unwrap_or((entry, ""));
        let key = key.trim();
        if key.is_empty() {
            return Err(DatadogError::ConfigError(format!(
                "default tag '{}' has an empty key",
                entry
            )));
        }
        tags.insert(key.to_string(), value.trim().to_string());
    }

    Ok(tags)
}

fn env_first(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|v| !v.is_empty())
}

fn env_bool(name: &str) -> Result<Option<bool>> {
    match env_first(&[name]) {
        None => Ok(None),
        Some(v) => match v.as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            other => Err(DatadogError::ConfigError(format!(
                "{} must be 'true' or 'false', got '{}'",
                name, other
            ))),
        },
    }
}

fn env_u64(name: &str) -> Result<Option<u64>> {
    env_first(&[name])
        .map(|v| {
            v.parse::<u64>().map_err(|_| {
                DatadogError::ConfigError(format!("{} must be a positive integer, got '{}'", name, v))
            })
        })
        .transpose()
}
