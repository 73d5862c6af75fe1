//! Checkout contact details, order submission and confirmation.
//!
//! The order endpoint receives an [`OrderSubmission`] as JSON and answers
//! with an [`OrderResponse`] wrapping the recorded order, which is reconciled
//! with the submission into a [`PlacedOrder`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::OrderAddress;
use crate::cart::{CartState, LineItem};
use crate::types::{Email, OrderId, Price, ProductId, Quantity, UserId};

/// Per-field problems with the checkout form.
#[derive(thiserror::Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("checkout details are incomplete")]
pub struct ContactErrors {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl ContactErrors {
    /// Whether every field passed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.address.is_none()
    }
}

/// Validated checkout contact fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDetails {
    pub name: String,
    pub email: Email,
    pub address: String,
}

impl ContactDetails {
    /// Validate the three free-text checkout fields.
    ///
    /// Name and address must be non-blank; email must parse as an [`Email`].
    /// Values are trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`ContactErrors`] listing every field that failed.
    pub fn parse(name: &str, email: &str, address: &str) -> Result<Self, ContactErrors> {
        let mut errors = ContactErrors::default();

        let name = name.trim();
        if name.is_empty() {
            errors.name = Some("Name is required".to_string());
        }

        let address = address.trim();
        if address.is_empty() {
            errors.address = Some("Address is required".to_string());
        }

        let email = match Email::parse(email) {
            Ok(email) => Some(email),
            Err(e) => {
                errors.email = Some(capitalize(&e.to_string()));
                None
            }
        };

        match email {
            Some(email) if errors.is_empty() => Ok(Self {
                name: name.to_owned(),
                email,
                address: address.to_owned(),
            }),
            _ => Err(errors),
        }
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Why an order could not be built.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("cannot place an order for an empty cart")]
    EmptyCart,
}

/// The body sent to the order endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmission {
    pub name: String,
    pub email: Email,
    pub address: String,
    pub user_id: UserId,
    pub cart_items: Vec<LineItem>,
}

impl OrderSubmission {
    /// Package contact details with the cart's current lines.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::EmptyCart`] when the cart has no lines.
    pub fn new(
        contact: ContactDetails,
        user_id: UserId,
        cart: &CartState,
    ) -> Result<Self, SubmissionError> {
        if cart.is_empty() {
            return Err(SubmissionError::EmptyCart);
        }
        Ok(Self {
            name: contact.name,
            email: contact.email,
            address: contact.address,
            user_id,
            cart_items: cart.items().to_vec(),
        })
    }
}

/// One line of the recorded order as echoed back.
///
/// The endpoint may echo full lines, bare product references or `null`, so
/// every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoedItem {
    #[serde(default, alias = "_id")]
    pub id: Option<ProductId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub image: Option<String>,
}

impl EchoedItem {
    /// The cart line this echo describes, if it carries every field.
    #[must_use]
    pub fn to_line_item(&self) -> Option<LineItem> {
        Some(LineItem {
            id: self.id.clone()?,
            name: self.name.clone()?,
            price: Price::new(self.price?).ok()?,
            quantity: Quantity::new(self.quantity?)?,
            image: self.image.clone(),
        })
    }
}

/// The recorded order echoed back by the order endpoint.
///
/// Only the order ID is required; use [`OrderConfirmation::reconcile`] to
/// fill the gaps from what was submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<OrderAddress>,
    #[serde(default)]
    pub cart_items: Option<Vec<Option<EchoedItem>>>,
}

impl OrderConfirmation {
    /// Combine the echo with the submission it answers.
    ///
    /// Blank or missing contact fields fall back to the submitted ones. The
    /// echoed lines are used only when every submitted line comes back in
    /// full; otherwise the submitted lines are shown.
    #[must_use]
    pub fn reconcile(self, submitted: &OrderSubmission) -> PlacedOrder {
        let echoed: Option<Vec<LineItem>> = self
            .cart_items
            .into_iter()
            .flatten()
            .map(|item| item.as_ref().and_then(EchoedItem::to_line_item))
            .collect();
        let cart_items = echoed
            .filter(|lines| lines.len() == submitted.cart_items.len())
            .unwrap_or_else(|| submitted.cart_items.clone());

        let address = self
            .address
            .map(|address| address.lines().join(", "))
            .filter(|address| !address.is_empty())
            .unwrap_or_else(|| submitted.address.clone());

        PlacedOrder {
            id: self.id,
            name: non_blank(self.name).unwrap_or_else(|| submitted.name.clone()),
            email: non_blank(self.email).unwrap_or_else(|| submitted.email.to_string()),
            address,
            cart_items,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Success body of the order endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub order: OrderConfirmation,
}

/// A placed order as shown to the visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub id: OrderId,
    pub name: String,
    pub email: String,
    pub address: String,
    pub cart_items: Vec<LineItem>,
}

impl PlacedOrder {
    /// Sum of the line totals.
    #[must_use]
    pub fn total(&self) -> Price {
        self.cart_items.iter().map(LineItem::line_total).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::cart::{CartStore, NewLineItem};

    fn filled_cart() -> CartStore {
        let mut cart = CartStore::default();
        cart.add_item(NewLineItem {
            id: ProductId::new("sofa-1"),
            name: "Library Stool".to_string(),
            price: Price::from_cents(2000),
            image: None,
            quantity: None,
        });
        cart
    }

    fn submission() -> OrderSubmission {
        let contact = ContactDetails::parse("Ada", "ada@example.com", "1 Loop Rd").unwrap();
        OrderSubmission::new(contact, UserId::new("guest"), filled_cart().state()).unwrap()
    }

    #[test]
    fn test_parse_trims_fields() {
        let contact = ContactDetails::parse(" Ada ", "ada@example.com", " 1 Loop Rd ").unwrap();
        assert_eq!(contact.name, "Ada");
        assert_eq!(contact.address, "1 Loop Rd");
    }

    #[test]
    fn test_parse_reports_every_blank_field() {
        let errors = ContactDetails::parse("", "  ", "\t").unwrap_err();
        assert_eq!(errors.name.as_deref(), Some("Name is required"));
        assert_eq!(errors.email.as_deref(), Some("Email is required"));
        assert_eq!(errors.address.as_deref(), Some("Address is required"));
    }

    #[test]
    fn test_parse_rejects_bad_email_only() {
        let errors = ContactDetails::parse("Ada", "not-an-email", "1 Loop Rd").unwrap_err();
        assert!(errors.name.is_none());
        assert!(errors.address.is_none());
        assert!(errors.email.is_some());
    }

    #[test]
    fn test_submission_wire_shape() {
        let contact = ContactDetails::parse("Ada", "ada@example.com", "1 Loop Rd").unwrap();
        let cart = filled_cart();
        let submission =
            OrderSubmission::new(contact, UserId::new("user123"), cart.state()).unwrap();

        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["userId"], "user123");
        assert_eq!(json["email"], "ada@example.com");
        assert_eq!(json["cartItems"][0]["id"], "sofa-1");
        assert_eq!(json["cartItems"][0]["quantity"], 1);
    }

    #[test]
    fn test_submission_requires_items() {
        let contact = ContactDetails::parse("Ada", "ada@example.com", "1 Loop Rd").unwrap();
        let result = OrderSubmission::new(contact, UserId::new("u"), &CartState::default());
        assert_eq!(result, Err(SubmissionError::EmptyCart));
    }

    #[test]
    fn test_confirmation_parses_endpoint_body() {
        let body = r#"{
            "order": {
                "_id": "order-9",
                "_type": "order",
                "name": "Ada",
                "email": "ada@example.com",
                "address": "1 Loop Rd",
                "cartItems": [{"id": "sofa-1", "name": "Library Stool", "price": 20, "quantity": 2}]
            }
        }"#;
        let response: OrderResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.order.id.as_str(), "order-9");

        let placed = response.order.reconcile(&submission());
        assert_eq!(placed.cart_items.len(), 1);
        assert_eq!(placed.cart_items[0].quantity, Quantity::new(2).unwrap());
        assert_eq!(placed.total(), Price::from_cents(4000));
    }

    #[test]
    fn test_reference_echo_falls_back_to_submitted_lines() {
        let body = r#"{
            "order": {
                "_id": "order-10",
                "address": {"street1": "1 Loop Rd", "city_locality": "Austin"},
                "cartItems": [{"_type": "reference", "_ref": "sofa-1", "_key": "k1"}]
            }
        }"#;
        let response: OrderResponse = serde_json::from_str(body).unwrap();
        let placed = response.order.reconcile(&submission());

        assert_eq!(placed.id.as_str(), "order-10");
        assert_eq!(placed.name, "Ada");
        assert_eq!(placed.email, "ada@example.com");
        assert_eq!(placed.address, "1 Loop Rd, Austin");
        assert_eq!(placed.cart_items, filled_cart().state().items());
        assert_eq!(placed.total(), Price::from_cents(2000));
    }

    #[test]
    fn test_partial_echo_falls_back_to_submitted_lines() {
        let body = r#"{
            "order": {
                "_id": "order-11",
                "name": "  ",
                "address": null,
                "cartItems": [null]
            }
        }"#;
        let response: OrderResponse = serde_json::from_str(body).unwrap();
        let placed = response.order.reconcile(&submission());

        assert_eq!(placed.name, "Ada");
        assert_eq!(placed.address, "1 Loop Rd");
        assert_eq!(placed.cart_items.len(), 1);
        assert_eq!(placed.cart_items[0].name, "Library Stool");
    }
}
