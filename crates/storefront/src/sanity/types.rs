//! Document shapes returned by the content API.
//!
//! GROQ projections yield `null` for fields a document does not have, so
//! every non-key field is optional or defaults on `null`.

use lounge_core::{NewLineItem, Price, ProductId, Quantity, WishlistItem};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Envelope around every query result.
#[derive(Debug, Deserialize)]
pub struct QueryResponse<T> {
    pub result: T,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub discount_percentage: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price_without_discount: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub rating: Option<Decimal>,
    #[serde(default)]
    pub rating_count: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Product {
    /// The sale price, if one is set and non-negative.
    #[must_use]
    pub fn price(&self) -> Option<Price> {
        self.price.and_then(|amount| Price::new(amount).ok())
    }

    /// Pre-discount price, shown struck through when a discount applies.
    #[must_use]
    pub fn original_price(&self) -> Option<Price> {
        let discounted = self
            .discount_percentage
            .is_some_and(|pct| pct > Decimal::ZERO);
        if !discounted {
            return None;
        }
        self.price_without_discount
            .and_then(|amount| Price::new(amount).ok())
    }

    /// Formatted sale price, or a placeholder when unpriced.
    #[must_use]
    pub fn price_display(&self) -> String {
        self.price()
            .map_or_else(|| "Price unavailable".to_string(), |p| p.display())
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "Untitled product"
        } else {
            &self.name
        }
    }

    /// A cart line for this product, or `None` when it has no price.
    #[must_use]
    pub fn to_line_item(&self, quantity: Option<Quantity>) -> Option<NewLineItem> {
        Some(NewLineItem {
            id: self.id.clone(),
            name: self.display_name().to_owned(),
            price: self.price()?,
            image: self.image.clone(),
            quantity,
        })
    }

    /// A wishlist entry for this product, or `None` when it has no price.
    #[must_use]
    pub fn to_wishlist_item(&self) -> Option<WishlistItem> {
        Some(WishlistItem {
            id: self.id.clone(),
            name: self.display_name().to_owned(),
            price: self.price()?,
            image: self.image.clone().unwrap_or_default(),
        })
    }
}

/// Deserialize `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
