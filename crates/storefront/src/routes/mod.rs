//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (product grid)
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (content API reachable)
//!
//! # Products
//! GET  /products/{id}          - Product detail
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (returns flash, triggers cart-updated)
//! POST /cart/increase          - Increase quantity (returns cart_items fragment)
//! POST /cart/decrease          - Decrease quantity (returns cart_items fragment)
//! POST /cart/delete            - Remove line (returns cart_items fragment)
//! POST /cart/clear             - Empty the cart (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Wishlist
//! GET  /wishlist               - Wishlist page
//! POST /wishlist/add           - Save a product (returns flash, triggers wishlist-updated)
//! POST /wishlist/remove        - Remove a saved product (returns wishlist_items fragment)
//!
//! # Checkout
//! GET  /checkout               - Contact form
//! POST /checkout               - Submit order
//!
//! # Analytics
//! GET  /analytics              - Sales dashboard
//! ```
//!
//! Without the `HX-Request` header every POST answers with a redirect.

pub mod analytics;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new().route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/increase", post(cart::increase))
        .route("/decrease", post(cart::decrease))
        .route("/delete", post(cart::delete))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/add", post(wishlist::add))
        .route("/remove", post(wishlist::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        .route("/checkout", get(checkout::show).post(checkout::submit))
        .route("/analytics", get(analytics::dashboard))
}
