//! Outbound services for storefront.
//!
//! # Services
//!
//! - `orders` - Order submission to the external order recorder

pub mod orders;

pub use orders::{OrderClient, OrderError};
