//! Harness configuration.
//!
//! # Design
//! `Config` is built once, validated, and then handed by reference to every
//! client constructor. Nothing reads configuration lazily or globally. Values
//! come from a TOML file and can be overridden per field from the
//! environment, which is how CI injects the API key and token.

use std::{fmt, fmt::Write as _, fs, path::Path};

use chrono::Local;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.trello.com/1";
pub const DEFAULT_DATE_TIME_FORMAT: &str = "%Y%m%d-%H%M%S%3f";

pub const ENV_BASE_URL: &str = "TRELLO_BASE_URL";
pub const ENV_API_KEY: &str = "TRELLO_API_KEY";
pub const ENV_API_TOKEN: &str = "TRELLO_API_TOKEN";
pub const ENV_DATE_TIME_FORMAT: &str = "TRELLO_DATE_TIME_FORMAT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("invalid date/time format: {0:?}")]
    InvalidDateTimeFormat(String),
}

/// On-disk shape. Every field is optional so env overrides can fill gaps.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    base_url: Option<String>,
    api_key: Option<String>,
    api_token: Option<String>,
    date_time_format: Option<String>,
}

/// Validated, immutable settings for one harness run.
#[derive(Clone)]
pub struct Config {
    base_url: String,
    api_key: String,
    api_token: String,
    date_time_format: String,
}

impl Config {
    pub fn new(
        base_url: &str,
        api_key: &str,
        api_token: &str,
        date_time_format: &str,
    ) -> Result<Self, ConfigError> {
        Self::from_raw(RawConfig {
            base_url: Some(base_url.to_string()),
            api_key: Some(api_key.to_string()),
            api_token: Some(api_token.to_string()),
            date_time_format: Some(date_time_format.to_string()),
        })
    }

    /// Load a TOML file, then apply `TRELLO_*` environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let raw: RawConfig = toml::from_str(&text)?;
        Self::from_raw(with_overrides(raw, env_lookup))
    }

    /// Build a config from `TRELLO_*` environment variables alone.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Self::from_raw(with_overrides(RawConfig::default(), lookup))
    }

    /// Parse TOML text without consulting the environment.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let base_url = non_empty(raw.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if base_url.is_empty() {
            return Err(ConfigError::Missing("base_url"));
        }
        let api_key = non_empty(raw.api_key).ok_or(ConfigError::Missing("api_key"))?;
        let api_token = non_empty(raw.api_token).ok_or(ConfigError::Missing("api_token"))?;
        let date_time_format = non_empty(raw.date_time_format)
            .unwrap_or_else(|| DEFAULT_DATE_TIME_FORMAT.to_string());
        validate_date_time_format(&date_time_format)?;

        Ok(Self {
            base_url,
            api_key,
            api_token,
            date_time_format,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    pub fn date_time_format(&self) -> &str {
        &self.date_time_format
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("api_token", &"<redacted>")
            .field("date_time_format", &self.date_time_format)
            .finish()
    }
}

/// Reject strftime patterns chrono cannot render. Some specifiers parse but
/// are only valid for parsing (`%#z`), so the check formats the current time.
pub(crate) fn validate_date_time_format(pattern: &str) -> Result<(), ConfigError> {
    let mut rendered = String::new();
    if write!(rendered, "{}", Local::now().format(pattern)).is_err() {
        return Err(ConfigError::InvalidDateTimeFormat(pattern.to_string()));
    }
    Ok(())
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn with_overrides(mut raw: RawConfig, lookup: impl Fn(&str) -> Option<String>) -> RawConfig {
    let fields = [
        (ENV_BASE_URL, &mut raw.base_url),
        (ENV_API_KEY, &mut raw.api_key),
        (ENV_API_TOKEN, &mut raw.api_token),
        (ENV_DATE_TIME_FORMAT, &mut raw.date_time_format),
    ];
    for (name, slot) in fields {
        if let Some(value) = non_empty(lookup(name)) {
            *slot = Some(value);
        }
    }
    raw
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
