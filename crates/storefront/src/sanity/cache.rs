//! Cache types for content API responses.

use std::sync::Arc;

use lounge_core::ProductId;

use super::types::Product;

/// Cache key for catalog queries.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
    Products,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(Arc<[Product]>),
}
