//! Order endpoint client.
//!
//! Submits a checked-out cart to the external order recorder. Exactly one
//! request is made per submission; failures are reported, never retried.

use std::time::Duration;

use lounge_core::{OrderConfirmation, OrderResponse, OrderSubmission};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::OrderEndpointConfig;

/// Upper bound on a single submission round trip.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors that can occur when submitting an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Success status but the body was not `{ "order": ... }`.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Client could not be built from configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Client for the order recording endpoint.
#[derive(Clone)]
pub struct OrderClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl OrderClient {
    /// Create a new order endpoint client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &OrderEndpointConfig) -> Result<Self, OrderError> {
        let mut headers = HeaderMap::new();

        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| OrderError::Config(format!("Invalid API token format: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.url.clone(),
        })
    }

    /// Submit an order and return the recorded confirmation.
    ///
    /// Any 2xx body naming an order ID is accepted; its lines and contact
    /// fields may be partial or references.
    ///
    /// # Errors
    ///
    /// Returns error on network failure, a non-2xx response, or a body that
    /// does not contain an order.
    #[instrument(skip(self, order), fields(items = order.cart_items.len()))]
    pub async fn submit(&self, order: &OrderSubmission) -> Result<OrderConfirmation, OrderError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(order)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Order endpoint rejected submission");
            return Err(OrderError::Api {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        let body: OrderResponse = response
            .json()
            .await
            .map_err(|e| OrderError::Parse(e.to_string()))?;

        tracing::info!(order_id = %body.order.id, "Order recorded");
        Ok(body.order)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Json, Router, http::HeaderMap as AxumHeaders, http::StatusCode, routing::post};
    use lounge_core::{
        CartStore, ContactDetails, NewLineItem, OrderAddress, Price, ProductId, UserId,
    };
    use secrecy::SecretString;
    use serde_json::{Value, json};

    use super::*;

    async fn serve(app: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        Url::parse(&format!("http://{addr}/api/orders")).unwrap()
    }

    fn submission() -> OrderSubmission {
        let mut cart = CartStore::default();
        cart.add_item(NewLineItem {
            id: ProductId::new("p1"),
            name: "Sofa".to_string(),
            price: Price::from_cents(10_000),
            image: None,
            quantity: None,
        });
        let contact = ContactDetails::parse("Ada", "ada@example.com", "1 Loop Rd").unwrap();
        OrderSubmission::new(contact, UserId::new("guest"), cart.state()).unwrap()
    }

    #[tokio::test]
    async fn test_submit_echoes_order() {
        let app = Router::new().route(
            "/api/orders",
            post(|headers: AxumHeaders, Json(body): Json<Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Json(json!({
                    "order": {
                        "_id": "order-1",
                        "name": body["name"],
                        "email": body["email"],
                        "address": auth,
                        "cartItems": body["cartItems"],
                    }
                }))
            }),
        );
        let config = OrderEndpointConfig {
            url: serve(app).await,
            token: Some(SecretString::from("tok3nV4lue")),
        };

        let order = OrderClient::new(&config)
            .unwrap()
            .submit(&submission())
            .await
            .unwrap();
        assert_eq!(order.id.as_str(), "order-1");
        assert_eq!(
            order.address,
            Some(OrderAddress::Plain("Bearer tok3nV4lue".to_string()))
        );

        let placed = order.reconcile(&submission());
        assert_eq!(placed.cart_items.len(), 1);
        assert_eq!(placed.total(), Price::from_cents(10_000));
    }

    #[tokio::test]
    async fn test_reference_echo_is_accepted() {
        let app = Router::new().route(
            "/api/orders",
            post(|| async {
                Json(json!({
                    "order": {
                        "_id": "order-2",
                        "address": {"street1": "1 Loop Rd"},
                        "cartItems": [{"_type": "reference", "_ref": "p1"}],
                    }
                }))
            }),
        );
        let config = OrderEndpointConfig {
            url: serve(app).await,
            token: None,
        };

        let order = OrderClient::new(&config)
            .unwrap()
            .submit(&submission())
            .await
            .unwrap();
        let placed = order.reconcile(&submission());
        assert_eq!(placed.id.as_str(), "order-2");
        assert_eq!(placed.address, "1 Loop Rd");
        assert_eq!(placed.cart_items, submission().cart_items);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_http_error() {
        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = OrderEndpointConfig {
            url: Url::parse(&format!("http://{addr}/api/orders")).unwrap(),
            token: None,
        };

        let err = OrderClient::new(&config)
            .unwrap()
            .submit(&submission())
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::Http(_)));
    }

    #[tokio::test]
    async fn test_non_success_is_api_error() {
        let app = Router::new().route(
            "/api/orders",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "database down") }),
        );
        let config = OrderEndpointConfig {
            url: serve(app).await,
            token: None,
        };

        let err = OrderClient::new(&config)
            .unwrap()
            .submit(&submission())
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_missing_order_is_parse_error() {
        let app = Router::new().route(
            "/api/orders",
            post(|| async { Json(json!({"ok": true})) }),
        );
        let config = OrderEndpointConfig {
            url: serve(app).await,
            token: None,
        };

        let err = OrderClient::new(&config)
            .unwrap()
            .submit(&submission())
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::Parse(_)));
    }
}
