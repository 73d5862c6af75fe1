//! Lounge Core - cart, wishlist and order types.
//!
//! This crate holds everything about the storefront that does not touch the
//! network:
//! - `storefront` - Public-facing site (renders and mutates these types)
//! - `cli` - Command-line tools for querying the content API
//!
//! # Architecture
//!
//! The core crate contains only types, reducers and pure computations - no
//! I/O, no HTTP clients, no session storage. Cart and wishlist state are
//! mutated exclusively through closed action enums handled by a [`Reducer`],
//! and held by a [`Store`] that swaps whole snapshots.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, quantities and emails
//! - [`store`] - Generic snapshot-swapping state container
//! - [`cart`] - Cart line items, actions and reducer
//! - [`wishlist`] - Wishlist items, actions and reducer
//! - [`order`] - Checkout contact details, order submission and confirmation
//! - [`analytics`] - Sales summary over recorded orders

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod analytics;
pub mod cart;
pub mod order;
pub mod store;
pub mod types;
pub mod wishlist;

pub use analytics::{OrderAddress, SalesOrder, SalesSummary, ShippingAddress, SoldItem};
pub use cart::{CartAction, CartRejection, CartState, CartStore, LineItem, NewLineItem};
pub use order::{
    ContactDetails, ContactErrors, EchoedItem, OrderConfirmation, OrderResponse,
    OrderSubmission, PlacedOrder, SubmissionError,
};
pub use store::{Reducer, Store};
pub use types::*;
pub use wishlist::{WishlistAction, WishlistState, WishlistStore, WishlistItem};
