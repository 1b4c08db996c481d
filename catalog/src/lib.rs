//! # Storefront Catalog
//!
//! Catalog data model and the paginated product search client.
//!
//! The client issues `GET {base}/products/search?q={search}&limit={page_size}&skip={skip}`
//! with a `version` header and unwraps the `{ success, data }` envelope.
//! Every failure is a [`CatalogError`] that normalizes to one
//! [`ErrorPayload`] shape (`{ message, status: "failed", statusCode }`).
//!
//! ```no_run
//! use storefront_catalog::{CatalogConfig, HttpCatalogClient, SearchQuery};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpCatalogClient::new(CatalogConfig::default())?;
//! let page = client.search(&SearchQuery::first_page("phone")).await?;
//! println!("{} of {} products", page.products.len(), page.total);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::{CatalogClient, CatalogResult, FetchFuture, HttpCatalogClient};
pub use config::{CatalogConfig, ConfigError};
pub use error::{CatalogError, ErrorPayload, FailureStatus};
pub use types::{CatalogPage, Dimensions, Meta, Product, ProductId, Review, SearchQuery};
