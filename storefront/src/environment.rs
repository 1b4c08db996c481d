//! Dependencies injected into the catalog reducer.

use std::sync::Arc;
use storefront_catalog::{CatalogClient, ConfigError, HttpCatalogClient};

/// Environment for [`crate::CatalogReducer`]
#[derive(Clone)]
pub struct CatalogEnvironment {
    /// Source of catalog pages
    pub client: Arc<dyn CatalogClient>,
}

impl CatalogEnvironment {
    /// Creates an environment around `client`
    #[must_use]
    pub fn new(client: Arc<dyn CatalogClient>) -> Self {
        Self { client }
    }

    /// Environment backed by the HTTP client configured from `STOREFRONT_*` variables
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for invalid settings.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(Arc::new(HttpCatalogClient::from_env()?)))
    }
}

impl std::fmt::Debug for CatalogEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogEnvironment").finish_non_exhaustive()
    }
}
