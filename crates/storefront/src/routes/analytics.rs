//! Sales dashboard.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use lounge_core::{SalesOrder, SalesSummary, SoldItem};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::models::{Notice, notice};
use crate::state::AppState;

/// One row of the orders table.
#[derive(Clone)]
pub struct OrderRow {
    pub name: String,
    pub email: String,
    /// Empty when the order carries no address.
    pub address_lines: Vec<String>,
    pub created_at: String,
    /// Empty when the order has no (non-null) items.
    pub items: Vec<String>,
}

fn describe_item(item: &SoldItem) -> String {
    let name = item.name.as_deref().unwrap_or("Unknown item");
    let price = item
        .price
        .map_or_else(|| "-".to_string(), |price| format!("${price:.2}"));
    format!("{name} - {} x {price}", item.units())
}

impl From<&SalesOrder> for OrderRow {
    fn from(order: &SalesOrder) -> Self {
        Self {
            name: order.name.clone().unwrap_or_default(),
            email: order.email.clone().unwrap_or_default(),
            address_lines: order
                .address
                .as_ref()
                .map(lounge_core::OrderAddress::lines)
                .unwrap_or_default(),
            created_at: order.created_at_display(),
            items: order.items().map(describe_item).collect(),
        }
    }
}

/// Sales dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "analytics/dashboard.html")]
pub struct DashboardTemplate {
    pub revenue: String,
    pub items_sold: u64,
    pub order_count: usize,
    pub orders: Vec<OrderRow>,
    pub notices: Vec<Notice>,
}

impl DashboardTemplate {
    fn new(orders: &[SalesOrder], notices: Vec<Notice>) -> Self {
        let summary = SalesSummary::from_orders(orders);
        Self {
            revenue: summary.revenue_display(),
            items_sold: summary.items_sold,
            order_count: summary.order_count,
            orders: orders.iter().map(OrderRow::from).collect(),
            notices,
        }
    }
}

/// Display the sales dashboard.
#[instrument(skip(state, session))]
pub async fn dashboard(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse> {
    let orders = state.content().orders().await?;
    tracing::debug!(orders = orders.len(), "Loaded orders for dashboard");
    let notices = notice::take_all(&session).await;

    Ok(DashboardTemplate::new(&orders, notices))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
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
                    "createdAt": "2026-03-01T10:30:00Z",
                    "cartItems": [
                        {"_id": "a", "name": "Stool", "price": 10, "quantity": 2},
                        null
                    ]
                },
                {
                    "_id": "o2",
                    "name": "Grace",
                    "email": "grace@example.com",
                    "address": null,
                    "createdAt": null,
                    "cartItems": null
                }
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_dashboard_rows() {
        let page = DashboardTemplate::new(&orders(), Vec::new());
        assert_eq!(page.revenue, "$20.00");
        assert_eq!(page.items_sold, 2);
        assert_eq!(page.order_count, 2);

        let first = page.orders.first().unwrap();
        assert_eq!(first.items, vec!["Stool - 2 x $10.00".to_string()]);
        assert_eq!(first.created_at, "2026-03-01 10:30 UTC");
        assert_eq!(first.address_lines.first().map(String::as_str), Some("1 Loop Rd"));

        let html = page.render().unwrap();
        assert!(html.contains("No address available"));
        assert!(html.contains("No items in the cart"));
    }
}
