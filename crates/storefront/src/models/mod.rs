//! Session-held models for storefront.
//!
//! Cart and wishlist live in the visitor's session as serialized
//! [`lounge_core::CartState`] and [`lounge_core::WishlistState`]. A request
//! rebuilds the store, dispatches one action and writes the state back;
//! [`crate::middleware::session_lock`] keeps requests on one session from
//! overlapping.

pub mod notice;
pub mod session;

pub use notice::{Notice, NoticeLevel};
pub use session::keys as session_keys;
