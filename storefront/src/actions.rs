//! Inputs to the catalog reducer.

use crate::types::{CartSummary, RequestToken};
use std::sync::Arc;
use storefront_catalog::{CatalogPage, ErrorPayload, Product, ProductId, SearchQuery};

/// Every input the catalog reducer accepts
///
/// User intents and effect feedback share one type. `ProductListingLoaded`
/// and `ProductListingFailed` are produced by the fetch effect and carry the
/// token of the request they answer.
#[derive(Clone, Debug, PartialEq)]
pub enum CatalogAction {
    // Listing
    /// Start fetching the page described by `query`
    ProductListing {
        /// Search text and offset
        query: SearchQuery,
    },

    /// Fetch the page after the held products, if more exist and nothing is in flight
    LoadNextPage,

    /// Fetch the first page of the last search again
    Refresh,

    /// A fetch succeeded
    ProductListingLoaded {
        /// Request this page answers
        token: RequestToken,
        /// Query that was sent
        query: SearchQuery,
        /// Page returned by the catalog
        page: CatalogPage,
    },

    /// A fetch failed
    ProductListingFailed {
        /// Request this failure answers
        token: RequestToken,
        /// Query that was sent
        query: SearchQuery,
        /// Normalized error
        error: ErrorPayload,
    },

    /// Reset the fetch status to idle
    ClearProductLoading,

    // Favorites
    /// Add `product` to favorites, or remove it if already there
    AddOrRemoveFavorite {
        /// Product to toggle
        product: Arc<Product>,
    },

    // Cart
    /// Add `product` to the cart with quantity 1, or remove its line
    AddOrRemoveToCart {
        /// Product to toggle
        product: Arc<Product>,
    },

    /// Increase the quantity of an existing cart line
    AddMoreItem {
        /// Product whose line to change
        product: Arc<Product>,
    },

    /// Decrease the quantity of an existing cart line, dropping it at 1
    RemoveItem {
        /// Product whose line to change
        product: Arc<Product>,
    },

    /// A quantity change named a product that has no cart line
    ItemNotFound {
        /// The missing product
        id: ProductId,
    },

    /// Request checkout of the current cart
    Checkout,

    /// Checkout was acknowledged with the totals at that moment
    CheckoutConfirmed {
        /// Cart totals
        summary: CartSummary,
    },
}

impl CatalogAction {
    /// First page of `search`
    #[must_use]
    pub fn search(search: impl Into<String>) -> Self {
        Self::ProductListing {
            query: SearchQuery::first_page(search),
        }
    }

    /// Whether this action answers a fetch
    #[must_use]
    pub const fn is_fetch_result(&self) -> bool {
        matches!(
            self,
            Self::ProductListingLoaded { .. } | Self::ProductListingFailed { .. }
        )
    }
}
