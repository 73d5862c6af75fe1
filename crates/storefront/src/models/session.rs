//! Session-related types.
//!
//! Loading and saving the per-visitor stores.

use lounge_core::{CartState, CartStore, WishlistState, WishlistStore};
use tower_sessions::Session;

/// Session keys for storefront data.
pub mod keys {
    /// Key for the serialized cart.
    pub const CART: &str = "cart";

    /// Key for the serialized wishlist.
    pub const WISHLIST: &str = "wishlist";

    /// Key for pending flash notices.
    pub const NOTICES: &str = "notices";
}

/// Rebuild the visitor's cart store from the session.
///
/// A visitor with no cart yet gets an empty one.
///
/// # Errors
///
/// Returns an error if the session store fails or the stored value no longer
/// deserializes.
pub async fn load_cart(session: &Session) -> Result<CartStore, tower_sessions::session::Error> {
    let state = session
        .get::<CartState>(keys::CART)
        .await?
        .unwrap_or_default();
    Ok(CartStore::new(state))
}

/// Write the cart back if any action changed it.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_cart(
    session: &Session,
    cart: &CartStore,
) -> Result<(), tower_sessions::session::Error> {
    if cart.revision() == 0 {
        return Ok(());
    }
    session.insert(keys::CART, cart.state()).await
}

/// Rebuild the visitor's wishlist store from the session.
///
/// # Errors
///
/// Returns an error if the session store fails or the stored value no longer
/// deserializes.
pub async fn load_wishlist(
    session: &Session,
) -> Result<WishlistStore, tower_sessions::session::Error> {
    let state = session
        .get::<WishlistState>(keys::WISHLIST)
        .await?
        .unwrap_or_default();
    Ok(WishlistStore::new(state))
}

/// Write the wishlist back if any action changed it.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_wishlist(
    session: &Session,
    wishlist: &WishlistStore,
) -> Result<(), tower_sessions::session::Error> {
    if wishlist.revision() == 0 {
        return Ok(());
    }
    session.insert(keys::WISHLIST, wishlist.state()).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use lounge_core::{NewLineItem, Price, ProductId};
    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_cart_round_trips_through_session() {
        let session = session();
        let mut cart = load_cart(&session).await.unwrap();
        assert!(cart.state().is_empty());

        cart.add_item(NewLineItem {
            id: ProductId::new("p1"),
            name: "Sofa".to_string(),
            price: Price::from_cents(1000),
            image: None,
            quantity: None,
        });
        cart.add_item(NewLineItem {
            id: ProductId::new("p1"),
            name: "Sofa".to_string(),
            price: Price::from_cents(1000),
            image: None,
            quantity: None,
        });
        save_cart(&session, &cart).await.unwrap();

        let reloaded = load_cart(&session).await.unwrap();
        assert_eq!(reloaded.state().total().display(), "$20.00");
        assert_eq!(reloaded.revision(), 0);
    }

    #[tokio::test]
    async fn test_unchanged_store_is_not_written() {
        let session = session();
        let wishlist = load_wishlist(&session).await.unwrap();
        save_wishlist(&session, &wishlist).await.unwrap();
        assert!(session.is_empty().await);
    }
}
