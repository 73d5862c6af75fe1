//! Save-for-later list.
//!
//! Mirrors the cart's shape without quantities. Items are unique by product
//! ID: adding a product that is already saved is accepted and changes
//! nothing.

use std::convert::Infallible;

use serde::{Deserialize, Serialize};

use crate::store::{Reducer, Store};
use crate::types::{Price, ProductId};

/// A saved product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Image URL; empty when the product has none.
    #[serde(default)]
    pub image: String,
}

/// Every operation the wishlist supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WishlistAction {
    Add(WishlistItem),
    Remove(ProductId),
}

/// The ordered list of saved items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistState {
    items: Vec<WishlistItem>,
}

impl WishlistState {
    #[must_use]
    pub fn items(&self) -> &[WishlistItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&WishlistItem> {
        self.items.iter().find(|item| &item.id == id)
    }
}

impl Reducer for WishlistState {
    type Action = WishlistAction;
    type Rejection = Infallible;

    fn reduce(&self, action: WishlistAction) -> Result<Option<Self>, Infallible> {
        Ok(match action {
            WishlistAction::Add(item) if self.contains(&item.id) => None,
            WishlistAction::Add(item) => {
                let mut items = self.items.clone();
                items.push(item);
                Some(Self { items })
            }
            WishlistAction::Remove(id) if !self.contains(&id) => None,
            WishlistAction::Remove(id) => Some(Self {
                items: self
                    .items
                    .iter()
                    .filter(|item| item.id != id)
                    .cloned()
                    .collect(),
            }),
        })
    }
}

/// The wishlist store.
pub type WishlistStore = Store<WishlistState>;

impl Store<WishlistState> {
    /// Save an item. Returns `false` if it was already saved.
    pub fn add_to_wishlist(&mut self, item: WishlistItem) -> bool {
        let Ok(changed) = self.dispatch(WishlistAction::Add(item));
        changed
    }

    /// Remove an item. Returns the removed item, or `None` if it was absent.
    pub fn remove_from_wishlist(&mut self, id: ProductId) -> Option<WishlistItem> {
        let removed = self.state().get(&id).cloned();
        let Ok(_) = self.dispatch(WishlistAction::Remove(id));
        removed
    }
}
