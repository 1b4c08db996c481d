//! # Storefront Testing
//!
//! Testing utilities and helpers for storefront reducers and stores.
//!
//! This crate provides:
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - [`MockCatalogClient`], a scripted stand-in for the HTTP catalog client
//! - Product and page fixtures
//! - proptest strategies for catalog types
//!
//! ## Example
//!
//! ```ignore
//! use storefront_testing::{fixtures, MockCatalogClient};
//! use storefront_runtime::Store;
//!
//! #[tokio::test]
//! async fn test_first_page() {
//!     let client = MockCatalogClient::new()
//!         .with_page(SearchQuery::first_page(""), fixtures::page(1..=10, 30, 0));
//!     let store = Store::new(CatalogState::new(), CatalogReducer, environment(client));
//!
//!     store.send(CatalogAction::search("")).await?.wait().await;
//!
//!     let held = store.state(|s| s.product_list_data.len()).await;
//!     assert_eq!(held, 10);
//! }
//! ```


pub use reducer_test::{ReducerTest, assertions, run_effects};

/// Mock implementations of environment traits
pub mod mocks {
    use std::collections::{HashMap, VecDeque};
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
    use std::time::Duration;
    use storefront_catalog::{
        CatalogClient, CatalogError, CatalogPage, CatalogResult, FetchFuture, SearchQuery,
    };
    use tokio::sync::Notify;

    /// When a scripted response is released
    #[derive(Clone, Debug)]
    enum Release {
        Immediately,
        After(Duration),
        OnNotify(Arc<Notify>),
    }

    #[derive(Clone, Debug)]
    struct Scripted {
        result: CatalogResult<CatalogPage>,
        release: Release,
    }

    #[derive(Debug, Default)]
    struct Script {
        responses: HashMap<SearchQuery, VecDeque<Scripted>>,
        requests: Vec<SearchQuery>,
    }

    /// Scripted [`CatalogClient`]
    ///
    /// Responses are queued per query and consumed in order. A query without a
    /// queued response fails with a 404 [`CatalogError::Api`]. Every request is
    /// recorded, answered or not.
    ///
    /// Clones share the same script.
    #[derive(Clone, Debug, Default)]
    pub struct MockCatalogClient {
        script: Arc<Mutex<Script>>,
    }

    impl MockCatalogClient {
        /// Create a client with no scripted responses
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        fn script(&self) -> MutexGuard<'_, Script> {
            self.script.lock().unwrap_or_else(PoisonError::into_inner)
        }

        fn push(&self, query: SearchQuery, result: CatalogResult<CatalogPage>, release: Release) {
            self.script()
                .responses
                .entry(query)
                .or_default()
                .push_back(Scripted { result, release });
        }

        /// Queue a successful page for `query`
        #[must_use]
        pub fn with_page(self, query: SearchQuery, page: CatalogPage) -> Self {
            self.push(query, Ok(page), Release::Immediately);
            self
        }

        /// Queue a failure for `query`
        #[must_use]
        pub fn with_error(self, query: SearchQuery, error: CatalogError) -> Self {
            self.push(query, Err(error), Release::Immediately);
            self
        }

        /// Queue a page for `query` that arrives after `delay`
        #[must_use]
        pub fn with_delayed_page(
            self,
            query: SearchQuery,
            page: CatalogPage,
            delay: Duration,
        ) -> Self {
            self.push(query, Ok(page), Release::After(delay));
            self
        }

        /// Queue a page for `query` that is held back until `gate` is notified
        #[must_use]
        pub fn with_gated_page(
            self,
            query: SearchQuery,
            page: CatalogPage,
            gate: Arc<Notify>,
        ) -> Self {
            self.push(query, Ok(page), Release::OnNotify(gate));
            self
        }

        /// Queries received so far, in call order
        #[must_use]
        pub fn requests(&self) -> Vec<SearchQuery> {
            self.script().requests.clone()
        }

        /// Number of queries received so far
        #[must_use]
        pub fn request_count(&self) -> usize {
            self.script().requests.len()
        }

        /// This client as a shared trait object
        #[must_use]
        pub fn shared(&self) -> Arc<dyn CatalogClient> {
            Arc::new(self.clone())
        }
    }

    impl CatalogClient for MockCatalogClient {
        fn fetch_page(&self, query: SearchQuery) -> FetchFuture {
            let scripted = {
                let mut script = self.script();
                script.requests.push(query.clone());
                script
                    .responses
                    .get_mut(&query)
                    .and_then(VecDeque::pop_front)
            };

            Box::pin(async move {
                let Some(Scripted { result, release }) = scripted else {
                    return Err(CatalogError::Api {
                        status: 404,
                        message: format!("No scripted response for {query:?}"),
                    });
                };

                match release {
                    Release::Immediately => {},
                    Release::After(delay) => tokio::time::sleep(delay).await,
                    Release::OnNotify(gate) => gate.notified().await,
                }

                result
            })
        }
    }
}

/// Catalog fixtures
pub mod fixtures {
    use std::ops::RangeInclusive;
    use std::sync::Arc;
    use storefront_catalog::{CatalogPage, Product, ProductId};

    /// Page size used by the fixtures, matching the default client configuration
    pub const PAGE_SIZE: u64 = 10;

    /// A product with the given id, title and price
    #[must_use]
    pub fn product(id: u64, title: &str, price: f64) -> Arc<Product> {
        Arc::new(Product::new(ProductId::new(id), title, price))
    }

    /// A product with a generated title and a price of `id` dollars
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Fixture ids are small
    pub fn numbered_product(id: u64) -> Arc<Product> {
        product(id, &format!("Product {id}"), id as f64)
    }

    /// A page of numbered products
    #[must_use]
    pub fn page(ids: RangeInclusive<u64>, total: u64, skip: u64) -> CatalogPage {
        CatalogPage::new(ids.map(numbered_product).collect(), total, skip, PAGE_SIZE)
    }

    /// Ids held by `page`, in order
    #[must_use]
    pub fn ids(page: &CatalogPage) -> Vec<u64> {
        page.products.iter().map(|p| p.id.value()).collect()
    }
}

/// Property-based testing utilities
///
/// proptest strategies for catalog types.
pub mod properties {
    use proptest::prelude::*;
    use std::sync::Arc;
    use storefront_catalog::{Product, ProductId};

    /// Product ids drawn from a small range so that generated operations collide
    pub fn product_id() -> impl Strategy<Value = ProductId> {
        (1u64..=8).prop_map(ProductId::new)
    }

    /// Products with a small id and a price in cents precision
    pub fn product() -> impl Strategy<Value = Arc<Product>> {
        (product_id(), 0u32..100_000).prop_map(|(id, cents)| {
            Arc::new(Product::new(id, format!("Product {id}"), f64::from(cents) / 100.0))
        })
    }
}

pub use mocks::MockCatalogClient;
