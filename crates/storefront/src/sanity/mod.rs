//! Sanity content API client.
//!
//! # Architecture
//!
//! - GROQ queries sent over the HTTP query endpoint with `reqwest`
//! - Sanity is the source of truth for products and recorded orders
//! - In-memory caching via `moka` for catalog responses (5 minute TTL)
//! - Orders are never cached so the sales dashboard stays current
//!
//! # Example
//!
//! ```rust,ignore
//! use lounge_storefront::sanity::ContentClient;
//!
//! let client = ContentClient::new(&config.sanity)?;
//! let products = client.products().await?;
//! let sofa = client.product(&ProductId::new("sofa-1")).await?;
//! ```

mod cache;
mod client;
pub mod queries;
pub mod types;

pub use client::ContentClient;
pub use types::Product;

use thiserror::Error;

/// Errors that can occur when querying the content API.
#[derive(Debug, Error)]
pub enum ContentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Content API returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// First part of the response body.
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// No document matched.
    #[error("Not found: {0}")]
    NotFound(String),
}
