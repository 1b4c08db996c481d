//! Domain types for the catalog/cart feature.
//!
//! Products are shared as `Arc<Product>`: updating one cart line touches only
//! that line, every other entry keeps pointing at the same allocation.

use std::sync::Arc;
use storefront_catalog::{CatalogPage, Product, ProductId, SearchQuery};
use thiserror::Error;

/// Flat delivery fee charged on a non-empty cart
pub const DELIVERY_FEE: f64 = 10.0;

/// Fetch lifecycle of the product listing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadStatus {
    /// No fetch requested yet, or loading state cleared
    #[default]
    Idle,
    /// A fetch is in flight
    Loading,
    /// The latest fetch succeeded
    Loaded,
    /// The latest fetch failed; the last good page is still held
    Failed,
}

impl LoadStatus {
    /// Whether a fetch is in flight
    #[must_use]
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Identifier of one issued catalog fetch
///
/// Tokens grow monotonically; only the result of the latest one is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    /// Creates a token from its sequence number
    #[must_use]
    pub const fn new(sequence: u64) -> Self {
        Self(sequence)
    }

    /// Returns the sequence number
    #[must_use]
    pub const fn sequence(self) -> u64 {
        self.0
    }

    /// The token issued after this one
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for RequestToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors from cart quantity operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The cart has no line for this product
    #[error("No cart line item for product {0}")]
    ItemNotFound(ProductId),
}

/// A product in the cart with its quantity
#[derive(Clone, Debug, PartialEq)]
pub struct CartLineItem {
    /// The product
    pub product: Arc<Product>,
    /// Quantity, always at least 1
    pub count: u32,
}

impl CartLineItem {
    /// A new line with quantity 1
    #[must_use]
    pub const fn new(product: Arc<Product>) -> Self {
        Self { product, count: 1 }
    }

    /// Product id of this line
    #[must_use]
    pub fn id(&self) -> ProductId {
        self.product.id
    }

    /// `price * count`
    #[must_use]
    pub fn line_total(&self) -> f64 {
        self.product.price * f64::from(self.count)
    }
}

/// Outcome of a membership toggle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggled {
    /// The product was absent and got appended
    Added,
    /// The product was present and got removed
    Removed,
}

/// Cart lines in insertion order, unique by product id
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CartLineItems {
    items: Vec<CartLineItem>,
}

impl CartLineItems {
    /// Creates an empty cart
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Removes the line for `product` if present, otherwise appends it with count 1
    pub fn toggle(&mut self, product: Arc<Product>) -> Toggled {
        if let Some(index) = self.position(product.id) {
            self.items.remove(index);
            Toggled::Removed
        } else {
            self.items.push(CartLineItem::new(product));
            Toggled::Added
        }
    }

    /// Adds one to the quantity of an existing line and returns the new count
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if there is no line for `id`.
    pub fn increment(&mut self, id: ProductId) -> Result<u32, CartError> {
        let index = self.position(id).ok_or(CartError::ItemNotFound(id))?;
        let item = &mut self.items[index];
        item.count = item.count.saturating_add(1);
        Ok(item.count)
    }

    /// Takes one off an existing line, dropping the line at quantity 1
    ///
    /// Returns the remaining count, or `None` if the line was removed.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if there is no line for `id`.
    pub fn decrement(&mut self, id: ProductId) -> Result<Option<u32>, CartError> {
        let index = self.position(id).ok_or(CartError::ItemNotFound(id))?;
        if self.items[index].count <= 1 {
            self.items.remove(index);
            return Ok(None);
        }
        let item = &mut self.items[index];
        item.count -= 1;
        Ok(Some(item.count))
    }

    /// Whether the cart has a line for `id`
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.position(id).is_some()
    }

    /// The line for `id`
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Lines in insertion order
    #[must_use]
    pub fn as_slice(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Iterate over lines in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, CartLineItem> {
        self.items.iter()
    }

    /// Number of distinct lines
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the cart is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all quantities
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.count)).sum()
    }

    /// Sum of `price * count` over all lines
    #[must_use]
    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(CartLineItem::line_total).sum()
    }
}

impl<'a> IntoIterator for &'a CartLineItems {
    type Item = &'a CartLineItem;
    type IntoIter = std::slice::Iter<'a, CartLineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Favorited products in insertion order, unique by product id
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FavoriteSet {
    items: Vec<Arc<Product>>,
}

impl FavoriteSet {
    /// Creates an empty set
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Removes `product` if present, otherwise appends it
    pub fn toggle(&mut self, product: Arc<Product>) -> Toggled {
        if let Some(index) = self.items.iter().position(|p| p.same_as(&product)) {
            self.items.remove(index);
            Toggled::Removed
        } else {
            self.items.push(product);
            Toggled::Added
        }
    }

    /// Whether `id` is a favorite
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.items.iter().any(|p| p.id == id)
    }

    /// Favorites in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Arc<Product>> {
        self.items.iter()
    }

    /// Number of favorites
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no favorites
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Checkout totals derived from the cart
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CartSummary {
    /// Sum of quantities
    pub item_count: u64,
    /// Sum of line totals
    pub subtotal: f64,
    /// Flat fee, zero for an empty cart
    pub delivery_fee: f64,
    /// `subtotal + delivery_fee`
    pub total: f64,
}

impl CartSummary {
    /// Compute the summary of `cart`
    #[must_use]
    pub fn of(cart: &CartLineItems) -> Self {
        let subtotal = cart.subtotal();
        let delivery_fee = if cart.is_empty() { 0.0 } else { DELIVERY_FEE };
        Self {
            item_count: cart.total_quantity(),
            subtotal,
            delivery_fee,
            total: subtotal + delivery_fee,
        }
    }
}

/// State of the catalog/cart feature
///
/// Created once, empty and idle, and changed only by `CatalogReducer`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogState {
    /// Fetch lifecycle of the listing
    pub product_list_loading: LoadStatus,
    /// Accumulated listing
    pub product_list_data: CatalogPage,
    /// Favorited products
    pub favorite_list: FavoriteSet,
    /// Cart lines
    pub cart_item_list: CartLineItems,
    /// Most recently issued fetch; results of older ones are discarded
    pub latest_request: Option<RequestToken>,
    /// Query of the most recently issued fetch
    pub last_query: Option<SearchQuery>,
    /// First-page query of the search whose results are held
    pub listing_query: Option<SearchQuery>,
}

impl CatalogState {
    /// Creates the initial empty, idle state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current fetch status
    #[must_use]
    pub const fn product_list_loading(&self) -> LoadStatus {
        self.product_list_loading
    }

    /// Accumulated listing
    #[must_use]
    pub const fn product_list_data(&self) -> &CatalogPage {
        &self.product_list_data
    }

    /// Favorited products
    #[must_use]
    pub const fn favorite_list(&self) -> &FavoriteSet {
        &self.favorite_list
    }

    /// Cart lines
    #[must_use]
    pub const fn cart_item_list(&self) -> &CartLineItems {
        &self.cart_item_list
    }

    /// Whether `id` is a favorite
    #[must_use]
    pub fn is_favorite(&self, id: ProductId) -> bool {
        self.favorite_list.contains(id)
    }

    /// Whether `id` is in the cart
    #[must_use]
    pub fn is_in_cart(&self, id: ProductId) -> bool {
        self.cart_item_list.contains(id)
    }

    /// Checkout totals
    #[must_use]
    pub fn cart_summary(&self) -> CartSummary {
        CartSummary::of(&self.cart_item_list)
    }

    /// Whether `LoadNextPage` would issue a fetch now
    #[must_use]
    pub fn can_load_more(&self) -> bool {
        !self.product_list_loading.is_loading()
            && (self.pending_search().is_some() || self.product_list_data.has_more())
    }

    /// First page of the last issued search, if that search never landed
    ///
    /// The held listing then belongs to an older search and must not be
    /// continued with the newer one.
    #[must_use]
    pub fn pending_search(&self) -> Option<SearchQuery> {
        let issued = self.last_query.as_ref()?;
        let landed = self.listing_query.as_ref().map(|q| q.search.as_str());
        (landed != Some(issued.search.as_str())).then(|| issued.continuation(0))
    }

    /// Continuation of the search whose results are held
    #[must_use]
    pub fn next_page_query(&self) -> SearchQuery {
        self.listing_query
            .clone()
            .unwrap_or_default()
            .continuation(self.product_list_data.next_skip())
    }

    /// Record a new fetch for `query` and return its token
    pub(crate) fn issue_request(&mut self, query: SearchQuery) -> RequestToken {
        let token = self
            .latest_request
            .map_or(RequestToken::new(1), RequestToken::next);
        self.latest_request = Some(token);
        self.last_query = Some(query);
        token
    }

    /// Whether `token` identifies the most recently issued fetch
    #[must_use]
    pub fn is_latest(&self, token: RequestToken) -> bool {
        self.latest_request == Some(token)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;

    fn product(id: u64, price: f64) -> Arc<Product> {
        Arc::new(Product::new(ProductId::new(id), format!("Product {id}"), price))
    }

    #[test]
    fn test_cart_toggle_is_its_own_inverse() {
        let mut cart = CartLineItems::new();
        cart.toggle(product(1, 5.0));
        let before = cart.clone();

        assert_eq!(cart.toggle(product(2, 3.0)), Toggled::Added);
        assert_eq!(cart.toggle(product(2, 3.0)), Toggled::Removed);

        assert_eq!(cart, before);
    }

    #[test]
    fn test_cart_membership_by_id() {
        let mut cart = CartLineItems::new();
        cart.toggle(product(1, 5.0));

        // Same id, different instance and price: still the same line
        assert_eq!(cart.toggle(product(1, 4.0)), Toggled::Removed);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_increment_touches_only_its_line() {
        let mut cart = CartLineItems::new();
        let first = product(1, 5.0);
        cart.toggle(Arc::clone(&first));
        cart.toggle(product(2, 3.0));

        assert_eq!(cart.increment(ProductId::new(2)), Ok(2));

        let line = cart.get(ProductId::new(1)).unwrap();
        assert!(Arc::ptr_eq(&line.product, &first));
        assert_eq!(line.count, 1);
    }

    #[test]
    fn test_decrement_removes_at_one() {
        let mut cart = CartLineItems::new();
        cart.toggle(product(1, 5.0));
        cart.increment(ProductId::new(1)).unwrap();
        cart.increment(ProductId::new(1)).unwrap();

        assert_eq!(cart.decrement(ProductId::new(1)), Ok(Some(2)));
        assert!(cart.contains(ProductId::new(1)));
        assert_eq!(cart.decrement(ProductId::new(1)), Ok(Some(1)));
        assert_eq!(cart.decrement(ProductId::new(1)), Ok(None));
        assert!(!cart.contains(ProductId::new(1)));
    }

    #[test]
    fn test_quantity_ops_on_missing_item() {
        let mut cart = CartLineItems::new();
        cart.toggle(product(1, 5.0));
        let before = cart.clone();

        let missing = ProductId::new(99);
        assert_eq!(cart.increment(missing), Err(CartError::ItemNotFound(missing)));
        assert_eq!(cart.decrement(missing), Err(CartError::ItemNotFound(missing)));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_cart_totals() {
        let mut cart = CartLineItems::new();
        cart.toggle(product(1, 2.5));
        cart.toggle(product(2, 10.0));
        cart.increment(ProductId::new(1)).unwrap();
        cart.increment(ProductId::new(1)).unwrap();

        assert_eq!(cart.total_quantity(), 4);
        assert!((cart.subtotal() - 17.5).abs() < 1e-9);

        let summary = CartSummary::of(&cart);
        assert!((summary.total - 27.5).abs() < 1e-9);
        assert!((summary.delivery_fee - DELIVERY_FEE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_cart_summary_is_zero() {
        assert_eq!(CartSummary::of(&CartLineItems::new()), CartSummary::default());
    }

    #[test]
    fn test_favorites_toggle() {
        let mut favorites = FavoriteSet::new();

        assert_eq!(favorites.toggle(product(4, 1.0)), Toggled::Added);
        assert!(favorites.contains(ProductId::new(4)));
        assert_eq!(favorites.toggle(product(4, 1.0)), Toggled::Removed);
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_request_tokens_are_monotonic() {
        let mut state = CatalogState::new();

        let first = state.issue_request(SearchQuery::first_page("a"));
        let second = state.issue_request(SearchQuery::first_page("ab"));

        assert!(second > first);
        assert!(state.is_latest(second));
        assert!(!state.is_latest(first));
        assert_eq!(state.last_query, Some(SearchQuery::first_page("ab")));
    }

    #[test]
    fn test_pending_search_until_first_page_lands() {
        let mut state = CatalogState::new();
        assert_eq!(state.pending_search(), None);

        state.issue_request(SearchQuery::first_page("lamp"));
        state.listing_query = Some(SearchQuery::first_page("lamp"));
        state.issue_request(SearchQuery::new("lamp", 10));
        assert_eq!(state.pending_search(), None);

        state.issue_request(SearchQuery::first_page("desk"));
        assert_eq!(state.pending_search(), Some(SearchQuery::first_page("desk")));
    }
}
