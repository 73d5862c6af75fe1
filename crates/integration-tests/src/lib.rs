//! Integration test harness for Lounge.
//!
//! [`TestContext::new`] starts three things on ephemeral local ports:
//!
//! - a fake content API answering the storefront's GROQ queries from
//!   in-memory fixtures,
//! - a fake order endpoint that records every submission and echoes it back
//!   as a recorded order,
//! - the real storefront router built by [`lounge_storefront::app`].
//!
//! Requests go through a cookie-keeping `reqwest` client, so cart and
//! wishlist state persist across calls the way they do in a browser.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p lounge-integration-tests
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use lounge_storefront::{config::StorefrontConfig, state::AppState};
use reqwest::{Client, Response};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// Catalog served by the fake content API.
///
/// `stool-c` has no price and cannot be bought.
pub fn product_fixtures() -> Value {
    json!([
        {
            "_id": "chair-a",
            "name": "Reading Chair",
            "description": "Walnut frame with wool upholstery",
            "price": 10,
            "discountPercentage": null,
            "priceWithoutDiscount": null,
            "rating": 4.5,
            "ratingCount": 12,
            "tags": ["walnut", "wool"],
            "sizes": ["Standard"],
            "image": "https://cdn.sanity.io/images/test/production/chair.png"
        },
        {
            "_id": "lamp-b",
            "name": "Brass Lamp",
            "description": null,
            "price": 5.5,
            "discountPercentage": 10,
            "priceWithoutDiscount": 6.1,
            "rating": null,
            "ratingCount": null,
            "tags": null,
            "sizes": null,
            "image": null
        },
        {
            "_id": "stool-c",
            "name": "Bar Stool",
            "price": null
        }
    ])
}

/// Recorded orders served by the fake content API.
///
/// Revenue is $25.50 over 3 items and 2 orders; the second order has no
/// address and a deleted product.
pub fn order_fixtures() -> Value {
    json!([
        {
            "_id": "order-100",
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "address": {
                "street1": "12 Analytical Way",
                "city_locality": "London",
                "state_province": null,
                "postal_code": "N1 9GU",
                "country_code": "GB"
            },
            "createdAt": "2026-04-02T14:05:00Z",
            "cartItems": [
                {"_id": "chair-a", "name": "Reading Chair", "price": 10, "quantity": 2},
                {"_id": "lamp-b", "name": "Brass Lamp", "price": 5.5, "quantity": 1}
            ]
        },
        {
            "_id": "order-101",
            "name": "Grace Hopper",
            "email": "grace@example.com",
            "address": null,
            "createdAt": "2026-04-03T09:00:00Z",
            "cartItems": [null]
        }
    ])
}

/// Shared state of the fake content API and order endpoint.
#[derive(Default)]
pub struct FakeBackend {
    submissions: Mutex<Vec<Value>>,
    fail_orders: AtomicBool,
    echo_references: AtomicBool,
}

impl FakeBackend {
    /// Every body POSTed to the order endpoint, in order.
    pub async fn submissions(&self) -> Vec<Value> {
        self.submissions.lock().await.clone()
    }

    /// Make the order endpoint answer 500 from now on.
    pub fn fail_orders(&self) {
        self.fail_orders.store(true, Ordering::SeqCst);
    }

    /// Echo cart lines back as bare product references, the way the
    /// recorded order document stores them.
    pub fn echo_references(&self) {
        self.echo_references.store(true, Ordering::SeqCst);
    }
}

async fn content_query(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let query = params.get("query").map(String::as_str).unwrap_or_default();

    let result = if query.contains(r#"_type == "order""#) {
        order_fixtures()
    } else if let Some(id) = params.get("$id") {
        let id: String = serde_json::from_str(id).unwrap_or_default();
        let matches: Vec<Value> = product_fixtures()
            .as_array()
            .into_iter()
            .flatten()
            .filter(|product| product["_id"] == id.as_str())
            .cloned()
            .collect();
        Value::Array(matches)
    } else {
        product_fixtures()
    };

    Json(json!({ "result": result }))
}

async fn record_order(
    State(backend): State<Arc<FakeBackend>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut submissions = backend.submissions.lock().await;
    submissions.push(body.clone());

    if backend.fail_orders.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "order store unavailable" })),
        );
    }

    let cart_items: Value = if backend.echo_references.load(Ordering::SeqCst) {
        body["cartItems"]
            .as_array()
            .into_iter()
            .flatten()
            .map(|line| json!({ "_type": "reference", "_ref": line["id"] }))
            .collect()
    } else {
        body["cartItems"].clone()
    };

    let order = json!({
        "_id": format!("order-{}", submissions.len()),
        "name": body["name"],
        "email": body["email"],
        "address": body["address"],
        "cartItems": cart_items,
    });
    (StatusCode::OK, Json(json!({ "order": order })))
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");
    tokio::spawn(async move { axum::serve(listener, app).await });
    addr
}

/// A running storefront wired to fake collaborators.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub backend: Arc<FakeBackend>,
}

impl TestContext {
    /// Start the fakes and the storefront.
    pub async fn new() -> Self {
        Self::start(None).await
    }

    /// Like [`TestContext::new`], but the order endpoint URL points at a
    /// port nothing listens on.
    pub async fn with_unreachable_orders() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Listener has no address");
        drop(listener);
        Self::start(Some(format!("http://{addr}/api/orders"))).await
    }

    async fn start(order_endpoint: Option<String>) -> Self {
        let backend = Arc::new(FakeBackend::default());
        let fake = Router::new()
            .route("/v2025-01-01/data/query/production", get(content_query))
            .route("/api/orders", post(record_order))
            .with_state(Arc::clone(&backend));
        let backend_addr = serve(fake).await;

        let vars: HashMap<&str, String> = HashMap::from([
            ("STOREFRONT_BASE_URL", "http://127.0.0.1".to_string()),
            ("SANITY_PROJECT_ID", "test".to_string()),
            ("SANITY_API_BASE_URL", format!("http://{backend_addr}/")),
            (
                "ORDER_ENDPOINT_URL",
                order_endpoint.unwrap_or_else(|| format!("http://{backend_addr}/api/orders")),
            ),
        ]);
        let config = StorefrontConfig::from_source(&|key| vars.get(key).cloned())
            .expect("Failed to build test configuration");
        let state = AppState::new(config).expect("Failed to build application state");
        let storefront_addr = serve(lounge_storefront::app(state)).await;

        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("http://{storefront_addr}"),
            backend,
        }
    }

    /// Absolute URL of a storefront path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a page, following redirects.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// POST a form the way a browser without JavaScript would.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// POST a form the way htmx does.
    pub async fn htmx_post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .header("hx-request", "true")
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// Current cart badge fragment, trimmed.
    pub async fn cart_badge(&self) -> String {
        let body = self
            .get("/cart/count")
            .await
            .text()
            .await
            .expect("Failed to read badge");
        body.trim().to_string()
    }
}
