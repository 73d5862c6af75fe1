//! Shopping cart state and reducer.
//!
//! ## Cart Operations
//! ```text
//!  Visitor action        CartAction             Effect on items
//!  ──────────────        ──────────             ───────────────
//!  Add to cart     ───►  Add(NewLineItem)  ───► qty += n, or append
//!  "+" button      ───►  Increase(id)      ───► qty += 1
//!  "-" button      ───►  Decrease(id)      ───► qty -= 1, refused at 1
//!  Remove          ───►  Delete(id)        ───► drop the line
//!  Order placed    ───►  Clear             ───► empty (no-op if empty)
//! ```
//!
//! Unknown ids are accepted as no-ops rather than errors.

use serde::{Deserialize, Serialize};

use crate::store::{Reducer, Store};
use crate::types::{Price, ProductId, Quantity};

/// A product in the cart with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product document ID. Unique within a cart.
    pub id: ProductId,
    /// Product name at the time it was added.
    pub name: String,
    /// Unit price at the time it was added.
    pub price: Price,
    /// Number of units, at least one.
    pub quantity: Quantity,
    /// Product image URL, if the product has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl LineItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity.get())
    }
}

/// Payload for [`CartAction::Add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLineItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: Option<String>,
    /// Units to add; `None` adds one.
    pub quantity: Option<Quantity>,
}

/// Every operation the cart supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Add units of a product, merging with an existing line.
    Add(NewLineItem),
    /// One more unit of a line.
    Increase(ProductId),
    /// One fewer unit of a line, never below one.
    Decrease(ProductId),
    /// Remove a line entirely.
    Delete(ProductId),
    /// Remove every line.
    Clear,
}

/// Why the cart refused an action.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartRejection {
    /// Decrease requested on a line that already holds a single unit.
    #[error("{name} is already at the minimum quantity of 1")]
    BelowMinimum {
        /// The line that was left unchanged.
        id: ProductId,
        /// Product name, for the notice shown to the visitor.
        name: String,
    },
}

/// The ordered list of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    items: Vec<LineItem>,
}

impl CartState {
    /// Lines in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Consume the state, returning its lines.
    #[must_use]
    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line by product ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Sum of price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Sum of quantities over all lines (the badge count).
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, item| acc.saturating_add(item.quantity.get()))
    }

    /// Copy of the lines with the line sharing `line.id` replaced.
    fn replacing(&self, line: &LineItem) -> Self {
        let items = self
            .items
            .iter()
            .map(|existing| {
                if existing.id == line.id {
                    line.clone()
                } else {
                    existing.clone()
                }
            })
            .collect();
        Self { items }
    }
}

impl Reducer for CartState {
    type Action = CartAction;
    type Rejection = CartRejection;

    fn reduce(&self, action: CartAction) -> Result<Option<Self>, CartRejection> {
        match action {
            CartAction::Add(new) => {
                let added = new.quantity.unwrap_or(Quantity::ONE);
                if let Some(existing) = self.get(&new.id) {
                    let mut line = existing.clone();
                    line.quantity = line.quantity.saturating_add(added);
                    return Ok(Some(self.replacing(&line)));
                }

                let mut items = self.items.clone();
                items.push(LineItem {
                    id: new.id,
                    name: new.name,
                    price: new.price,
                    quantity: added,
                    image: new.image,
                });
                Ok(Some(Self { items }))
            }
            CartAction::Increase(id) => Ok(self.get(&id).map(|existing| {
                let mut line = existing.clone();
                line.quantity = line.quantity.incremented();
                self.replacing(&line)
            })),
            CartAction::Decrease(id) => {
                let Some(existing) = self.get(&id) else {
                    return Ok(None);
                };
                let Some(quantity) = existing.quantity.decremented() else {
                    return Err(CartRejection::BelowMinimum {
                        id,
                        name: existing.name.clone(),
                    });
                };
                let mut line = existing.clone();
                line.quantity = quantity;
                Ok(Some(self.replacing(&line)))
            }
            CartAction::Delete(id) => {
                if self.get(&id).is_none() {
                    return Ok(None);
                }
                let items = self
                    .items
                    .iter()
                    .filter(|item| item.id != id)
                    .cloned()
                    .collect();
                Ok(Some(Self { items }))
            }
            CartAction::Clear => Ok((!self.items.is_empty()).then(Self::default)),
        }
    }
}

/// The cart store.
pub type CartStore = Store<CartState>;

impl Store<CartState> {
    /// Dispatch an action the reducer never refuses.
    fn apply(&mut self, action: CartAction) {
        match self.dispatch(action) {
            // Only `Decrease` produces a rejection.
            Ok(_) | Err(CartRejection::BelowMinimum { .. }) => {}
        }
    }

    /// Add units of a product. Always succeeds.
    pub fn add_item(&mut self, item: NewLineItem) {
        self.apply(CartAction::Add(item));
    }

    /// One more unit of `id`; no-op if absent.
    pub fn increase_quantity(&mut self, id: ProductId) {
        self.apply(CartAction::Increase(id));
    }

    /// One fewer unit of `id`; no-op if absent.
    ///
    /// # Errors
    ///
    /// Returns [`CartRejection::BelowMinimum`] when the line holds one unit.
    pub fn decrease_quantity(&mut self, id: ProductId) -> Result<(), CartRejection> {
        self.dispatch(CartAction::Decrease(id)).map(|_| ())
    }

    /// Remove `id` entirely; no-op if absent.
    pub fn delete_item(&mut self, id: ProductId) {
        self.apply(CartAction::Delete(id));
    }

    /// Remove every line; no-op if already empty.
    pub fn clear_cart(&mut self) {
        self.apply(CartAction::Clear);
    }
}
