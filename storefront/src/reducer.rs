//! Reducer logic for the catalog, favorites and cart.
//!
//! Fetches are described as effects. Each fetch gets a [`RequestToken`];
//! a result whose token is not the latest issued one is dropped, so a slow
//! response can never overwrite a newer search.

use crate::actions::CatalogAction;
use crate::environment::CatalogEnvironment;
use crate::types::{CartError, CatalogState, LoadStatus, RequestToken, Toggled};
use std::sync::Arc;
use storefront_catalog::{CatalogPage, Product, SearchQuery};
use storefront_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

/// Reducer for the catalog/cart feature
#[derive(Clone, Debug, Default)]
pub struct CatalogReducer;

impl CatalogReducer {
    /// Creates a new `CatalogReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Issue a fetch for `query` and describe it as an effect
    fn start_listing(
        state: &mut CatalogState,
        query: SearchQuery,
        env: &CatalogEnvironment,
    ) -> SmallVec<[Effect<CatalogAction>; 4]> {
        let token = state.issue_request(query.clone());
        state.product_list_loading = LoadStatus::Loading;

        tracing::debug!(%token, search = %query.search, skip = query.skip, "Catalog fetch issued");

        let client = Arc::clone(&env.client);
        smallvec![Effect::future(async move {
            let action = match client.fetch_page(query.clone()).await {
                Ok(page) => CatalogAction::ProductListingLoaded { token, query, page },
                Err(error) => CatalogAction::ProductListingFailed {
                    token,
                    query,
                    error: error.normalize(),
                },
            };
            Some(action)
        })]
    }

    /// Whether a fetch result should be applied; counts and logs the ones that are not
    fn accept_result(state: &CatalogState, token: RequestToken) -> bool {
        if state.is_latest(token) {
            return true;
        }
        metrics::counter!("catalog_stale_responses_total").increment(1);
        tracing::debug!(
            %token,
            latest = ?state.latest_request,
            "Discarding response to superseded request"
        );
        false
    }

    /// Apply a successful page: the first page replaces, later pages append
    fn merge_page(state: &mut CatalogState, query: &SearchQuery, page: CatalogPage) {
        if query.is_first_page() {
            state.product_list_data = page;
            state.listing_query = Some(query.clone());
            return;
        }

        let held = &mut state.product_list_data;
        held.products.extend(page.products);
        held.total = page.total;
        held.skip = page.skip;
        held.limit = page.limit;
    }

    fn toggle_favorite(state: &mut CatalogState, product: Arc<Product>) {
        let id = product.id;
        match state.favorite_list.toggle(product) {
            Toggled::Added => tracing::debug!(%id, "Added to favorites"),
            Toggled::Removed => tracing::debug!(%id, "Removed from favorites"),
        }
    }

    fn toggle_cart(state: &mut CatalogState, product: Arc<Product>) {
        let id = product.id;
        match state.cart_item_list.toggle(product) {
            Toggled::Added => tracing::debug!(%id, "Added to cart"),
            Toggled::Removed => tracing::debug!(%id, "Removed from cart"),
        }
    }

    /// Report a quantity change on a missing line without touching state
    fn item_not_found(error: &CartError) -> SmallVec<[Effect<CatalogAction>; 4]> {
        let CartError::ItemNotFound(id) = *error;
        tracing::warn!(%id, "{error}");
        smallvec![Effect::send(CatalogAction::ItemNotFound { id })]
    }
}

impl Reducer for CatalogReducer {
    type State = CatalogState;
    type Action = CatalogAction;
    type Environment = CatalogEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Listing ==========
            CatalogAction::ProductListing { query } => Self::start_listing(state, query, env),

            CatalogAction::LoadNextPage => {
                if state.product_list_loading.is_loading() {
                    tracing::trace!("Fetch in flight, not loading next page");
                    return SmallVec::new();
                }
                // The held listing belongs to an older search; start the new one over
                if let Some(query) = state.pending_search() {
                    tracing::debug!(search = %query.search, "Reissuing search that never landed");
                    return Self::start_listing(state, query, env);
                }
                if !state.product_list_data.has_more() {
                    tracing::trace!(
                        held = state.product_list_data.len(),
                        total = state.product_list_data.total,
                        "No next page to load"
                    );
                    return SmallVec::new();
                }
                let query = state.next_page_query();
                Self::start_listing(state, query, env)
            },

            CatalogAction::Refresh => {
                let query = state
                    .last_query
                    .as_ref()
                    .map(|q| q.continuation(0))
                    .unwrap_or_default();
                Self::start_listing(state, query, env)
            },

            CatalogAction::ProductListingLoaded { token, query, page } => {
                if Self::accept_result(state, token) {
                    Self::merge_page(state, &query, page);
                    state.product_list_loading = LoadStatus::Loaded;
                }
                SmallVec::new()
            },

            CatalogAction::ProductListingFailed {
                token,
                query,
                error,
            } => {
                if Self::accept_result(state, token) {
                    tracing::warn!(
                        search = %query.search,
                        skip = query.skip,
                        status_code = error.status_code,
                        "Product listing failed: {error}"
                    );
                    state.product_list_loading = LoadStatus::Failed;
                }
                SmallVec::new()
            },

            CatalogAction::ClearProductLoading => {
                state.product_list_loading = LoadStatus::Idle;
                SmallVec::new()
            },

            // ========== Favorites ==========
            CatalogAction::AddOrRemoveFavorite { product } => {
                Self::toggle_favorite(state, product);
                SmallVec::new()
            },

            // ========== Cart ==========
            CatalogAction::AddOrRemoveToCart { product } => {
                Self::toggle_cart(state, product);
                SmallVec::new()
            },

            CatalogAction::AddMoreItem { product } => {
                match state.cart_item_list.increment(product.id) {
                    Ok(count) => {
                        tracing::debug!(id = %product.id, count, "Cart quantity increased");
                        SmallVec::new()
                    },
                    Err(error) => Self::item_not_found(&error),
                }
            },

            CatalogAction::RemoveItem { product } => {
                match state.cart_item_list.decrement(product.id) {
                    Ok(Some(count)) => {
                        tracing::debug!(id = %product.id, count, "Cart quantity decreased");
                        SmallVec::new()
                    },
                    Ok(None) => {
                        tracing::debug!(id = %product.id, "Removed from cart");
                        SmallVec::new()
                    },
                    Err(error) => Self::item_not_found(&error),
                }
            },

            CatalogAction::Checkout => {
                let summary = state.cart_summary();
                tracing::info!(
                    items = summary.item_count,
                    total = summary.total,
                    "Checkout requested"
                );
                smallvec![Effect::send(CatalogAction::CheckoutConfirmed { summary })]
            },

            // Notifications for observers; state is already settled
            CatalogAction::ItemNotFound { .. } | CatalogAction::CheckoutConfirmed { .. } => {
                SmallVec::new()
            },
        }
    }
}
