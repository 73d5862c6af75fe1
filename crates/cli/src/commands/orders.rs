//! Sales reporting commands.
//!
//! # Usage
//!
//! ```bash
//! lounge-cli orders summary
//! ```

use lounge_core::{SalesOrder, SalesSummary};
use lounge_storefront::sanity::ContentClient;

use super::CommandError;

/// Log the headline sales numbers over every recorded order.
///
/// # Errors
///
/// Returns an error if the content API request fails.
pub async fn summary(client: &ContentClient) -> Result<(), CommandError> {
    let orders = client.orders().await?;
    let summary = SalesSummary::from_orders(&orders);

    tracing::info!("Total revenue: {}", summary.revenue_display());
    tracing::info!("Items sold:    {}", summary.items_sold);
    tracing::info!("Orders:        {}", summary.order_count);

    if let Some(latest) = latest_order(&orders) {
        tracing::info!("Latest order:  {}", latest.created_at_display());
    }
    Ok(())
}

/// Most recent order with a parseable timestamp.
fn latest_order(orders: &[SalesOrder]) -> Option<&SalesOrder> {
    orders
        .iter()
        .filter_map(|order| order.created_at().map(|at| (at, order)))
        .max_by_key(|(at, _)| *at)
        .map(|(_, order)| order)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_order_ignores_unparseable_dates() {
        let orders: Vec<SalesOrder> = serde_json::from_str(
            r#"[
                {"_id": "o1", "createdAt": "2026-01-05T09:00:00Z"},
                {"_id": "o2", "createdAt": "yesterday"},
                {"_id": "o3", "createdAt": "2026-02-11T17:45:00Z"}
            ]"#,
        )
        .unwrap();

        let latest = latest_order(&orders).unwrap();
        assert_eq!(latest.id.as_ref().map(ToString::to_string).as_deref(), Some("o3"));
    }
}
