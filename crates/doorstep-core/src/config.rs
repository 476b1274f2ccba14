//! Client configuration for the remote marketplace API.
//!
//! The API base path is configured externally: either passed explicitly by
//! the host application or read from the `DOORSTEP_API_URL` environment
//! variable. The refresh endpoint moved between gateway versions, so its
//! path is configurable with the current default.

use thiserror::Error;

use crate::util::{is_http_url, normalize_text_option};

/// Environment variable holding the API base URL.
pub const API_URL_ENV: &str = "DOORSTEP_API_URL";

/// Refresh endpoint on current gateways. Older deployments expose `/refresh`.
pub const DEFAULT_REFRESH_PATH: &str = "/auth/refresh";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API base URL is not configured. Set {API_URL_ENV} or pass --api-url.")]
    Missing,
    #[error("Invalid API base URL: {0}")]
    Invalid(&'static str),
}

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub refresh_path: String,
}

impl ClientConfig {
    pub fn new(api_base_url: impl AsRef<str>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: normalize_base_url(api_base_url.as_ref())?,
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
        })
    }

    /// Read the base URL from `DOORSTEP_API_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = normalize_text_option(std::env::var(API_URL_ENV).ok())
            .ok_or(ConfigError::Missing)?;
        Self::new(url)
    }

    /// Override the refresh endpoint path for older gateways.
    #[must_use]
    pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }
}

/// Normalize an API base URL: require an http(s) scheme, strip trailing
/// slashes, reject empties.
pub fn normalize_base_url(url: &str) -> Result<String, ConfigError> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::Missing);
    }
    if !is_http_url(trimmed) {
        return Err(ConfigError::Invalid(
            "base URL must include http:// or https://",
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_base_url_strips_trailing_slash() {
        let normalized = normalize_base_url("https://api.doorstep.example/").unwrap();
        assert_eq!(normalized, "https://api.doorstep.example");
    }

    #[test]
    fn normalize_base_url_rejects_missing_scheme() {
        assert!(normalize_base_url("api.doorstep.example").is_err());
        assert_eq!(normalize_base_url("   "), Err(ConfigError::Missing));
    }

    #[test]
    fn refresh_path_defaults_and_overrides() {
        let config = ClientConfig::new("https://api.doorstep.example").unwrap();
        assert_eq!(config.refresh_path, "/auth/refresh");
        let config = config.with_refresh_path("/refresh");
        assert_eq!(config.refresh_path, "/refresh");
    }
}
