//! Sales summary over recorded orders.
//!
//! Orders come back from the content API loosely shaped: the address may be a
//! structured shipping address, a plain string or absent, and dereferenced
//! cart items may be `null` when the referenced product was deleted. Every
//! field here is therefore optional, and the summary skips what it cannot
//! count.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::OrderId;

/// A structured shipping address as stored on an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub street1: Option<String>,
    pub city_locality: Option<String>,
    pub state_province: Option<String>,
    pub postal_code: Option<String>,
    pub country_code: Option<String>,
}

/// Address on a recorded order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderAddress {
    Structured(ShippingAddress),
    Plain(String),
}

impl OrderAddress {
    /// Non-empty display lines, street first.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Plain(text) => text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_owned)
                .collect(),
            Self::Structured(address) => {
                let locality = [&address.city_locality, &address.state_province]
                    .into_iter()
                    .flatten()
                    .map(String::as_str)
                    .filter(|part| !part.is_empty())
                    .collect::<Vec<_>>()
                    .join(", ");

                [
                    address.street1.clone(),
                    Some(locality),
                    address.postal_code.clone(),
                    address.country_code.clone(),
                ]
                .into_iter()
                .flatten()
                .filter(|line| !line.trim().is_empty())
                .collect()
            }
        }
    }
}

/// One product line on a recorded order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoldItem {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub quantity: Option<u32>,
}

impl SoldItem {
    /// Units sold; a missing quantity counts as zero.
    #[must_use]
    pub fn units(&self) -> u32 {
        self.quantity.unwrap_or(0)
    }

    /// `price × quantity`, treating missing values as zero.
    #[must_use]
    pub fn revenue(&self) -> Decimal {
        self.price.unwrap_or(Decimal::ZERO) * Decimal::from(self.units())
    }
}

/// An order as returned by the orders query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesOrder {
    #[serde(rename = "_id", default)]
    pub id: Option<OrderId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<OrderAddress>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub cart_items: Option<Vec<Option<SoldItem>>>,
}

impl SalesOrder {
    /// The non-null items on this order.
    pub fn items(&self) -> impl Iterator<Item = &SoldItem> {
        self.cart_items.iter().flatten().flatten()
    }

    /// Creation time, if the stored value is an RFC 3339 timestamp.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|at| at.with_timezone(&Utc))
    }

    /// Human-readable creation time; falls back to the stored text.
    #[must_use]
    pub fn created_at_display(&self) -> String {
        self.created_at().map_or_else(
            || self.created_at.clone().unwrap_or_default(),
            |at| at.format("%Y-%m-%d %H:%M UTC").to_string(),
        )
    }
}

/// Headline sales numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SalesSummary {
    pub total_revenue: Decimal,
    pub items_sold: u64,
    pub order_count: usize,
}

impl SalesSummary {
    /// Fold a set of orders into totals. Null items and orders without items
    /// still count towards `order_count` but add nothing else.
    #[must_use]
    pub fn from_orders(orders: &[SalesOrder]) -> Self {
        orders
            .iter()
            .flat_map(SalesOrder::items)
            .fold(
                Self {
                    order_count: orders.len(),
                    ..Self::default()
                },
                |mut summary, item| {
                    summary.total_revenue += item.revenue();
                    summary.items_sold += u64::from(item.units());
                    summary
                },
            )
    }

    /// Revenue formatted as dollars with two decimals.
    #[must_use]
    pub fn revenue_display(&self) -> String {
        format!("${:.2}", self.total_revenue.round_dp(2))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn orders() -> Vec<SalesOrder> {
        serde_json::from_str(
            r#"[
                {
                    "_id": "o1",
                    "name": "Ada",
                    "email": "ada@example.com",
                    "address": {"street1": "1 Loop Rd", "city_locality": "Austin", "state_province": "TX", "postal_code": "78701", "country_code": "US"},
                    "createdAt": "2025-01-20T10:30:00Z",
                    "cartItems": [
                        {"_id": "p1", "name": "Stool", "price": 10.5, "quantity": 2},
                        null,
                        {"_id": "p2", "name": "Lamp", "price": 4, "quantity": 1}
                    ]
                },
                {"_id": "o2", "name": "Grace", "email": "grace@example.com", "cartItems": null},
                {"_id": "o3", "address": "12 Main St", "createdAt": "yesterday"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_summary_skips_null_items() {
        let summary = SalesSummary::from_orders(&orders());
        assert_eq!(summary.total_revenue, Decimal::new(25, 0));
        assert_eq!(summary.items_sold, 3);
        assert_eq!(summary.order_count, 3);
        assert_eq!(summary.revenue_display(), "$25.00");
    }

    #[test]
    fn test_empty_summary() {
        let summary = SalesSummary::from_orders(&[]);
        assert_eq!(summary, SalesSummary::default());
        assert_eq!(summary.revenue_display(), "$0.00");
    }

    #[test]
    fn test_address_shapes() {
        let orders = orders();
        let structured = orders[0].address.as_ref().unwrap().lines();
        assert_eq!(structured, ["1 Loop Rd", "Austin, TX", "78701", "US"]);

        assert!(orders[1].address.is_none());
        assert_eq!(orders[2].address.as_ref().unwrap().lines(), ["12 Main St"]);
    }

    #[test]
    fn test_created_at_display() {
        let orders = orders();
        assert_eq!(orders[0].created_at_display(), "2025-01-20 10:30 UTC");
        assert_eq!(orders[1].created_at_display(), "");
        assert_eq!(orders[2].created_at_display(), "yesterday");
    }

    #[test]
    fn test_partial_structured_address_drops_blank_lines() {
        let address = OrderAddress::Structured(ShippingAddress {
            street1: Some("9 Elm".to_string()),
            country_code: Some("CA".to_string()),
            ..ShippingAddress::default()
        });
        assert_eq!(address.lines(), ["9 Elm", "CA"]);
    }
}
