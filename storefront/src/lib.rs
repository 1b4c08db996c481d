//! # Storefront
//!
//! Catalog listing, favorites and cart state for a storefront, driven by a
//! single reducer.
//!
//! - [`CatalogState`]: the paginated product listing with its fetch status,
//!   the favorite set and the cart, plus read-only selectors
//!   ([`CatalogState::is_favorite`], [`CatalogState::cart_summary`], ...)
//! - [`CatalogAction`]: user intents and fetch feedback
//! - [`CatalogReducer`]: all transitions; fetches are returned as effects
//! - [`CatalogEnvironment`]: the injected [`CatalogClient`](storefront_catalog::CatalogClient)
//!
//! ## Example
//!
//! ```no_run
//! use storefront::{CatalogAction, CatalogEnvironment, CatalogReducer, CatalogState, CatalogStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store: CatalogStore = CatalogStore::new(
//!     CatalogState::new(),
//!     CatalogReducer::new(),
//!     CatalogEnvironment::from_env()?,
//! );
//!
//! let mut handle = store.send(CatalogAction::search("phone")).await?;
//! handle.wait().await;
//!
//! let held = store.state(|s| s.product_list_data().len()).await;
//! println!("{held} products loaded");
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod environment;
pub mod reducer;
pub mod types;

pub use actions::CatalogAction;
pub use environment::CatalogEnvironment;
pub use reducer::CatalogReducer;
pub use types::{
    CartError, CartLineItem, CartLineItems, CartSummary, CatalogState, DELIVERY_FEE, FavoriteSet,
    LoadStatus, RequestToken, Toggled,
};

/// Store running the catalog reducer
pub type CatalogStore =
    storefront_runtime::Store<CatalogState, CatalogAction, CatalogEnvironment, CatalogReducer>;
