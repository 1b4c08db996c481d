//! Catalog data model: products, pages and search queries.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Identifier of a product, unique within a catalog snapshot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Creates a `ProductId` from its numeric value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Physical dimensions of a product
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
    /// Depth
    pub depth: f64,
}

/// A customer review attached to a product
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Review {
    /// Stars given, 1 to 5
    pub rating: f64,
    /// Review text
    pub comment: String,
    /// ISO 8601 timestamp
    pub date: String,
    /// Display name of the reviewer
    pub reviewer_name: String,
    /// Contact address of the reviewer
    pub reviewer_email: String,
}

/// Bookkeeping attached to a catalog record
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Meta {
    /// ISO 8601 creation timestamp
    pub created_at: String,
    /// ISO 8601 timestamp of the last update
    pub updated_at: String,
    /// EAN barcode
    pub barcode: String,
    /// URL of a QR code image
    pub qr_code: String,
}

/// Immutable catalog record as returned by the product search API
///
/// Two products are the same catalog entry when their ids match, even when
/// they were fetched as separate values (see [`Product::same_as`]).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier
    pub id: ProductId,
    /// Display title
    pub title: String,
    /// Long description
    #[serde(default)]
    pub description: String,
    /// Category slug
    #[serde(default)]
    pub category: String,
    /// Unit price, never negative
    pub price: f64,
    /// Advertised discount in percent
    #[serde(default)]
    pub discount_percentage: f64,
    /// Average review rating
    #[serde(default)]
    pub rating: f64,
    /// Units in stock
    #[serde(default)]
    pub stock: u32,
    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Brand name
    #[serde(default)]
    pub brand: Option<String>,
    /// Stock keeping unit
    #[serde(default)]
    pub sku: Option<String>,
    /// Shipping weight
    #[serde(default)]
    pub weight: Option<f64>,
    /// Physical dimensions
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
    /// Warranty text
    #[serde(default)]
    pub warranty_information: Option<String>,
    /// Shipping text
    #[serde(default)]
    pub shipping_information: Option<String>,
    /// Availability label ("In Stock", "Low Stock", ...)
    #[serde(default)]
    pub availability_status: Option<String>,
    /// Return policy text
    #[serde(default)]
    pub return_policy: Option<String>,
    /// Minimum quantity per order
    #[serde(default)]
    pub minimum_order_quantity: Option<u32>,
    /// Customer reviews
    #[serde(default)]
    pub reviews: Vec<Review>,
    /// Record timestamps and codes
    #[serde(default)]
    pub meta: Option<Meta>,
    /// Gallery image URLs
    #[serde(default)]
    pub images: Vec<String>,
    /// Thumbnail image URL
    #[serde(default)]
    pub thumbnail: String,
}

impl Product {
    /// Creates a product with only the fields the cart needs
    #[must_use]
    pub fn new(id: ProductId, title: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            category: String::new(),
            price,
            discount_percentage: 0.0,
            rating: 0.0,
            stock: 0,
            tags: Vec::new(),
            brand: None,
            sku: None,
            weight: None,
            dimensions: None,
            warranty_information: None,
            shipping_information: None,
            availability_status: None,
            return_policy: None,
            minimum_order_quantity: None,
            reviews: Vec::new(),
            meta: None,
            images: Vec::new(),
            thumbnail: String::new(),
        }
    }

    /// Identity comparison used for favorites and cart membership
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// One page of search results plus pagination metadata
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    /// Products in server order
    pub products: Vec<Arc<Product>>,
    /// Total number of matching products upstream
    pub total: u64,
    /// Offset of the first product of this page
    pub skip: u64,
    /// Page size that was requested
    pub limit: u64,
}

impl CatalogPage {
    /// Creates a page from its parts
    #[must_use]
    pub fn new(products: Vec<Arc<Product>>, total: u64, skip: u64, limit: u64) -> Self {
        Self {
            products,
            total,
            skip,
            limit,
        }
    }

    /// Returns the number of products held
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns `true` when no products are held
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Whether more products are available upstream than are held
    #[must_use]
    pub fn has_more(&self) -> bool {
        (self.products.len() as u64) < self.total
    }

    /// Offset a continuation request should start from
    #[must_use]
    pub fn next_skip(&self) -> u64 {
        self.products.len() as u64
    }

    /// Looks up a held product by id
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Arc<Product>> {
        self.products.iter().find(|p| p.id == id)
    }
}

/// Parameters of a paginated product search
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Search text; empty means no filter
    pub search: String,
    /// Offset of the first requested product
    pub skip: u64,
}

impl SearchQuery {
    /// Creates a query
    #[must_use]
    pub fn new(search: impl Into<String>, skip: u64) -> Self {
        Self {
            search: search.into(),
            skip,
        }
    }

    /// First page of a (possibly empty) search
    #[must_use]
    pub fn first_page(search: impl Into<String>) -> Self {
        Self::new(search, 0)
    }

    /// Same search, starting at `skip`
    #[must_use]
    pub fn continuation(&self, skip: u64) -> Self {
        Self::new(self.search.clone(), skip)
    }

    /// Whether this query replaces the current listing rather than extending it
    #[must_use]
    pub const fn is_first_page(&self) -> bool {
        self.skip == 0
    }
}
