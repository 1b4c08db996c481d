//! Configuration for the catalog client.
//!
//! Loads configuration from environment variables with sensible defaults.

use reqwest::Url;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default catalog API base URL
pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com";

/// Default number of products per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default value of the `version` request header
pub const DEFAULT_API_VERSION: &str = "2";

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Base URL is empty or does not parse as an absolute http(s) URL
    #[error("Invalid catalog base URL: {0}")]
    InvalidBaseUrl(String),

    /// Page size must be at least 1
    #[error("Page size must be greater than zero")]
    InvalidPageSize,

    /// Request timeout must be non-zero
    #[error("Request timeout must be greater than zero")]
    InvalidTimeout,

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Catalog client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Base URL of the catalog API, without the `/products/search` path
    pub base_url: String,
    /// Products requested per page (`limit` query parameter)
    pub page_size: u32,
    /// Upper bound for one request, surfaced as a network error when hit
    pub request_timeout: Duration,
    /// Value sent in the `version` header
    pub api_version: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

impl CatalogConfig {
    /// Creates a configuration pointing at `base_url` with default settings
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `STOREFRONT_CATALOG_URL` | `https://dummyjson.com` |
    /// | `STOREFRONT_PAGE_SIZE` | `10` |
    /// | `STOREFRONT_REQUEST_TIMEOUT_SECS` | `10` |
    /// | `STOREFRONT_API_VERSION` | `2` |
    ///
    /// Unparseable numbers fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] reported by [`CatalogConfig::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            base_url: env::var("STOREFRONT_CATALOG_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            page_size: env::var("STOREFRONT_PAGE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PAGE_SIZE),
            request_timeout: env::var("STOREFRONT_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map_or(DEFAULT_REQUEST_TIMEOUT, Duration::from_secs),
            api_version: env::var("STOREFRONT_API_VERSION")
                .unwrap_or_else(|_| DEFAULT_API_VERSION.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Set the page size
    #[must_use]
    pub const fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Check the configuration for values the client cannot work with
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidBaseUrl`] for an empty, relative or non-http(s) URL
    /// - [`ConfigError::InvalidPageSize`] for a zero page size
    /// - [`ConfigError::InvalidTimeout`] for a zero timeout
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ConfigError::InvalidBaseUrl(format!("{}: {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }

        if self.page_size == 0 {
            return Err(ConfigError::InvalidPageSize);
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }

        Ok(())
    }

    /// Search endpoint URL
    #[must_use]
    pub fn search_url(&self) -> String {
        format!("{}/products/search", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CatalogConfig::default();

        assert_eq!(config.page_size, 10);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_search_url_trims_trailing_slash() {
        let config = CatalogConfig::new("https://dummyjson.com/");
        assert_eq!(config.search_url(), "https://dummyjson.com/products/search");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(matches!(
            CatalogConfig::new("").validate(),
            Err(ConfigError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            CatalogConfig::new("ftp://catalog.example.com").validate(),
            Err(ConfigError::InvalidBaseUrl(_))
        ));
        assert_eq!(
            CatalogConfig::default().with_page_size(0).validate(),
            Err(ConfigError::InvalidPageSize)
        );
        assert_eq!(
            CatalogConfig::default()
                .with_request_timeout(Duration::ZERO)
                .validate(),
            Err(ConfigError::InvalidTimeout)
        );
    }
}
