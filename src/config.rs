//! 配置模块：后端地址、端点路径、超时与响应排序策略。
//!
//! Client configuration.
//!
//! Sources, lowest precedence first: [`CatalogConfig::default`], a YAML file
//! ([`CatalogConfig::from_yaml_file`]), environment overrides
//! ([`CatalogConfig::apply_env`]), then explicit builder setters.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `VOICE_CATALOG_BASE_URL` | `base_url` |
//! | `VOICE_CATALOG_REFRESH_PATH` | `refresh_path` |
//! | `VOICE_CATALOG_PREVIEW_PATH` | `preview_path` |
//! | `VOICE_CATALOG_HTTP_TIMEOUT_SECS` | `timeout_secs` |
//! | `VOICE_CATALOG_PROXY_URL` | `proxy_url` |
//! | `VOICE_CATALOG_PREVIEW_HIDE_DELAY_MS` | `preview_hide_delay_ms` |
//! | `VOICE_CATALOG_ORDERING` | `ordering` |

use crate::protocol::{DEFAULT_PREVIEW_PATH, DEFAULT_REFRESH_PATH};
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Default backend: a local node-editor server.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8188";

/// How long a UI should keep a failed preview surface visible.
pub const DEFAULT_PREVIEW_HIDE_DELAY_MS: u64 = 3000;

/// Which response wins when requests of the same kind overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseOrdering {
    /// Responses are applied as they arrive; the last one to arrive wins even
    /// when it answers an older request.
    #[default]
    LastArrivalWins,
    /// Responses older than the newest applied one are discarded and their
    /// call fails with [`Error::Superseded`].
    LatestRequestWins,
}

impl FromStr for ResponseOrdering {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "last_arrival_wins" => Ok(Self::LastArrivalWins),
            "latest_request_wins" => Ok(Self::LatestRequestWins),
            other => Err(Error::configuration_with_context(
                format!("Unknown response ordering '{}'", other),
                ErrorContext::new()
                    .with_field_path("ordering")
                    .with_details("expected last_arrival_wins or latest_request_wins"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    pub refresh_path: String,
    pub preview_path: String,
    /// Whole-request timeout; `None` leaves the HTTP client's default in place.
    pub timeout_secs: Option<u64>,
    pub proxy_url: Option<String>,
    pub preview_hide_delay_ms: u64,
    pub ordering: ResponseOrdering,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            preview_path: DEFAULT_PREVIEW_PATH.to_string(),
            timeout_secs: None,
            proxy_url: None,
            preview_hide_delay_ms: DEFAULT_PREVIEW_HIDE_DELAY_MS,
            ordering: ResponseOrdering::default(),
        }
    }
}

impl CatalogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid configuration: {}", e),
                ErrorContext::new().with_source("yaml"),
            )
        })
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text).map_err(|e| match e {
            Error::Configuration { message, context } => Error::Configuration {
                message,
                context: context.with_details(path.display().to_string()),
            },
            other => other,
        })
    }

    /// Overlay `VOICE_CATALOG_*` variables onto this configuration.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_vars(|key| env::var(key).ok())
    }

    fn apply_vars<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = var("VOICE_CATALOG_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = var("VOICE_CATALOG_REFRESH_PATH") {
            self.refresh_path = v;
        }
        if let Some(v) = var("VOICE_CATALOG_PREVIEW_PATH") {
            self.preview_path = v;
        }
        if let Some(v) = var("VOICE_CATALOG_HTTP_TIMEOUT_SECS") {
            self.timeout_secs = Some(parse_number("VOICE_CATALOG_HTTP_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = var("VOICE_CATALOG_PROXY_URL") {
            self.proxy_url = Some(v).filter(|p| !p.trim().is_empty());
        }
        if let Some(v) = var("VOICE_CATALOG_PREVIEW_HIDE_DELAY_MS") {
            self.preview_hide_delay_ms = parse_number("VOICE_CATALOG_PREVIEW_HIDE_DELAY_MS", &v)?;
        }
        if let Some(v) = var("VOICE_CATALOG_ORDERING") {
            self.ordering = v.parse()?;
        }
        Ok(())
    }

    /// Check the base URL and normalize endpoint paths to start with `/`.
    pub fn validate(mut self) -> Result<Self> {
        let parsed = url::Url::parse(&self.base_url).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid base URL: {}", e),
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(self.base_url.clone()),
            )
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::configuration_with_context(
                format!("Unsupported scheme '{}'", parsed.scheme()),
                ErrorContext::new().with_field_path("base_url"),
            ));
        }
        self.refresh_path = normalize_path("refresh_path", &self.refresh_path)?;
        self.preview_path = normalize_path("preview_path", &self.preview_path)?;
        Ok(self)
    }

    pub fn preview_hide_delay(&self) -> Duration {
        Duration::from_millis(self.preview_hide_delay_ms)
    }
}

fn normalize_path(field: &str, path: &str) -> Result<String> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(Error::configuration_with_context(
            "Endpoint path must not be empty",
            ErrorContext::new().with_field_path(field),
        ));
    }
    if trimmed.starts_with('/') {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("/{}", trimmed))
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value.trim().parse::<u64>().map_err(|_| {
        Error::configuration_with_context(
            format!("Expected a non-negative integer, got '{}'", value),
            ErrorContext::new().with_field_path(key),
        )
    })
}
