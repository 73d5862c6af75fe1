//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::middleware::SessionLocks;
use crate::sanity::ContentClient;
use crate::services::{OrderClient, OrderError};

/// Error building application state from configuration.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("content client: {0}")]
    Content(#[from] crate::config::ConfigError),
    #[error("order client: {0}")]
    Order(#[from] OrderError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Apart from the session lock
/// table it is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    content: ContentClient,
    orders: OrderClient,
    session_locks: SessionLocks,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if either outbound client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let content = ContentClient::new(&config.sanity)?;
        let orders = OrderClient::new(&config.orders)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                content,
                orders,
                session_locks: SessionLocks::default(),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the content API client.
    #[must_use]
    pub fn content(&self) -> &ContentClient {
        &self.inner.content
    }

    /// Get a reference to the order endpoint client.
    #[must_use]
    pub fn orders(&self) -> &OrderClient {
        &self.inner.orders
    }

    /// Get the per-session request locks.
    #[must_use]
    pub fn session_locks(&self) -> &SessionLocks {
        &self.inner.session_locks
    }
}
