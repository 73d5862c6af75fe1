//! Content API client implementation.
//!
//! Sends GROQ over the HTTP query endpoint with `reqwest` 0.13.
//! Caches catalog reads using `moka` (5-minute TTL).

use std::sync::Arc;
use std::time::Duration;

use lounge_core::{ProductId, SalesOrder};
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::ContentError;
use super::cache::{CacheKey, CacheValue};
use super::queries;
use super::types::{Product, QueryResponse};
use crate::config::{ConfigError, SanityConfig};

/// Client for the Sanity query API.
///
/// Products are cached for 5 minutes; orders are always fetched fresh.
#[derive(Clone)]
pub struct ContentClient {
    inner: Arc<ContentClientInner>,
}

struct ContentClientInner {
    client: reqwest::Client,
    endpoint: Url,
    token: Option<SecretString>,
    cache: Cache<CacheKey, CacheValue>,
}

impl ContentClient {
    /// Create a new content API client.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the query endpoint cannot be built from the
    /// configuration.
    pub fn new(config: &SanityConfig) -> Result<Self, ConfigError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(ContentClientInner {
                client: reqwest::Client::new(),
                endpoint: config.query_url()?,
                token: config.token.clone(),
                cache,
            }),
        })
    }

    /// The query endpoint requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Run a GROQ query and decode its `result`.
    ///
    /// `params` are `(name, value)` pairs; each value is JSON-encoded and sent
    /// as `$name`.
    async fn fetch<T: DeserializeOwned>(
        &self,
        query: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ContentError> {
        let mut pairs = vec![("query".to_string(), query.to_string())];
        for (name, value) in params {
            pairs.push((format!("${name}"), serde_json::to_string(value)?));
        }

        let mut request = self.inner.client.get(self.inner.endpoint.clone()).query(&pairs);
        if let Some(token) = &self.inner.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Content API returned non-success status"
            );
            return Err(ContentError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        match serde_json::from_str::<QueryResponse<T>>(&body) {
            Ok(response) => Ok(response.result),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse content API response"
                );
                Err(ContentError::Parse(e))
            }
        }
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// List every product in the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Arc<[Product]>, ContentError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products: Arc<[Product]> = self
            .fetch::<Vec<Product>>(queries::ALL_PRODUCTS, &[])
            .await?
            .into();

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(Arc::clone(&products)))
            .await;

        Ok(products)
    }

    /// Get a product by its document ID.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NotFound` if no product has this ID, or an error
    /// if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: &ProductId) -> Result<Product, ContentError> {
        let cache_key = CacheKey::Product(id.clone());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product = self
            .fetch::<Vec<Product>>(queries::PRODUCT_BY_ID, &[("id", id.as_str())])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ContentError::NotFound(format!("Product not found: {id}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    // =========================================================================
    // Order Methods
    // =========================================================================

    /// List recorded orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn orders(&self) -> Result<Vec<SalesOrder>, ContentError> {
        let orders: Vec<SalesOrder> = self.fetch(queries::ALL_ORDERS, &[]).await?;
        debug!(count = orders.len(), "Fetched orders");
        Ok(orders)
    }

    /// Drop every cached catalog entry.
    pub fn invalidate_cache(&self) {
        self.inner.cache.invalidate_all();
    }
}
