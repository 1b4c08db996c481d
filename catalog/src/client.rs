//! Paginated product search client

use crate::config::{CatalogConfig, ConfigError};
use crate::error::CatalogError;
use crate::types::{CatalogPage, SearchQuery};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

/// Result of a catalog fetch
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Boxed future returned by [`CatalogClient::fetch_page`]
pub type FetchFuture = Pin<Box<dyn Future<Output = CatalogResult<CatalogPage>> + Send>>;

/// Source of catalog pages
///
/// The client owns no shared state, so several fetches may be in flight at
/// once. Sequencing their results is the caller's job. Implementations do
/// not retry.
pub trait CatalogClient: Send + Sync {
    /// Fetch one page of products matching `query`
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Network`] when no response arrived,
    /// [`CatalogError::Api`] when the server signaled failure, and
    /// [`CatalogError::Decode`] when the body is not a catalog envelope.
    fn fetch_page(&self, query: SearchQuery) -> FetchFuture;
}

/// Response envelope: `{ success, data }` or `{ success: false, message | error_description }`
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    data: Option<CatalogPage>,
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    error_description: Option<String>,
}

impl Envelope {
    /// Message to surface for a `success != true` envelope
    fn failure_message(&self) -> String {
        match &self.message {
            Some(serde_json::Value::String(message)) => message.clone(),
            other => self
                .error_description
                .clone()
                .or_else(|| other.as_ref().filter(|v| !v.is_null()).map(ToString::to_string))
                .unwrap_or_else(|| "Unknown error".to_string()),
        }
    }
}

/// HTTP implementation of [`CatalogClient`]
#[derive(Clone)]
pub struct HttpCatalogClient {
    client: Client,
    config: Arc<CatalogConfig>,
}

impl HttpCatalogClient {
    /// Create a client for the given configuration
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid or the
    /// underlying HTTP client cannot be built.
    pub fn new(config: CatalogConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Create a client from `STOREFRONT_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for invalid settings.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(CatalogConfig::from_env()?)
    }

    /// The configuration this client was built with
    #[must_use]
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Fetch one page of products
    ///
    /// # Errors
    ///
    /// See [`CatalogClient::fetch_page`].
    #[tracing::instrument(skip(self, query), fields(search = %query.search, offset = query.skip))]
    pub async fn search(&self, query: &SearchQuery) -> CatalogResult<CatalogPage> {
        let started = Instant::now();
        let result = self.request(query).await;

        metrics::histogram!("catalog_fetch_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        match &result {
            Ok(page) => {
                metrics::counter!("catalog_fetch_total", "outcome" => "success").increment(1);
                tracing::debug!(
                    products = page.products.len(),
                    total = page.total,
                    "Catalog page fetched"
                );
            },
            Err(error) => {
                metrics::counter!("catalog_fetch_total", "outcome" => error.kind()).increment(1);
                tracing::warn!(error = %error, "Catalog fetch failed");
            },
        }

        result
    }

    async fn request(&self, query: &SearchQuery) -> CatalogResult<CatalogPage> {
        let response = self
            .client
            .get(self.config.search_url())
            .query(&[
                ("q", query.search.clone()),
                ("limit", self.config.page_size.to_string()),
                ("skip", query.skip.to_string()),
            ])
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .header("version", self.config.api_version.as_str())
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: http_failure_message(status, &body),
            });
        }

        let envelope: Envelope =
            serde_json::from_slice(&body).map_err(|e| CatalogError::Decode {
                status: status.as_u16(),
                message: e.to_string(),
            })?;

        if envelope.success != Some(true) {
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: envelope.failure_message(),
            });
        }

        envelope.data.ok_or_else(|| CatalogError::Decode {
            status: status.as_u16(),
            message: "successful response without data".to_string(),
        })
    }
}

/// Message for a non-2xx response: the body's `message`, else the status text
fn http_failure_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| match status.canonical_reason() {
            Some(reason) => reason.to_string(),
            None => format!("Request failed with status code {}", status.as_u16()),
        })
}

impl CatalogClient for HttpCatalogClient {
    fn fetch_page(&self, query: SearchQuery) -> FetchFuture {
        let client = self.clone();
        Box::pin(async move { client.search(&query).await })
    }
}
