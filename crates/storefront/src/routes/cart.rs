//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Plain form posts get a redirect back to the cart page with the outcome
//! stashed as a flash notice.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use lounge_core::{CartState, CartStore, LineItem, ProductId, Quantity};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::HxRequest;
use crate::models::{Notice, notice, session};
use crate::state::AppState;

/// HTMX event fired whenever the cart changes.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image: Option<String>,
    /// A decrease would be refused.
    pub at_minimum: bool,
}

impl From<&LineItem> for CartItemView {
    fn from(line: &LineItem) -> Self {
        Self {
            id: line.id.to_string(),
            name: line.name.clone(),
            quantity: line.quantity.get(),
            price: line.price.display(),
            line_price: line.line_total().display(),
            image: line.image.clone(),
            at_minimum: line.quantity == Quantity::ONE,
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl From<&CartState> for CartView {
    fn from(cart: &CartState) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            subtotal: cart.total().display(),
            item_count: cart.total_quantity(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub id: String,
    pub quantity: Option<u32>,
}

/// Form naming a single cart line.
#[derive(Debug, Deserialize)]
pub struct CartLineForm {
    pub id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub notices: Vec<Notice>,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
    pub notices: Vec<Notice>,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Flash notices fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/flash.html")]
pub struct FlashTemplate {
    pub notices: Vec<Notice>,
}

/// Save the cart and answer a line action.
///
/// HTMX gets the refreshed line list; plain posts are redirected to `/cart`.
async fn respond(
    HxRequest(is_htmx): HxRequest,
    session: &Session,
    cart: &CartStore,
    notice: Option<Notice>,
) -> Result<Response> {
    session::save_cart(session, cart).await?;

    if is_htmx {
        return Ok((
            AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
            CartItemsTemplate {
                cart: CartView::from(cart.state()),
                notices: notice.into_iter().collect(),
            },
        )
            .into_response());
    }

    if let Some(notice) = notice {
        notice.stash(session).await;
    }
    Ok(Redirect::to("/cart").into_response())
}

/// Display cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<impl IntoResponse> {
    let cart = session::load_cart(&session).await?;
    let notices = notice::take_all(&session).await;

    Ok(CartShowTemplate {
        cart: CartView::from(cart.state()),
        notices,
    })
}

/// Add a product to the cart.
///
/// Name, price and image come from the catalog, not the form. Adding a
/// product already in the cart merges into its line.
#[instrument(skip(state, session, hx))]
pub async fn add(
    State(state): State<AppState>,
    hx: HxRequest,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let quantity = form
        .quantity
        .map(|n| {
            Quantity::new(n).ok_or_else(|| AppError::BadRequest("quantity must be at least 1".into()))
        })
        .transpose()?;

    let product = state.content().product(&ProductId::new(form.id)).await?;
    let line = product.to_line_item(quantity).ok_or_else(|| {
        AppError::BadRequest(format!("{} is not available for purchase", product.display_name()))
    })?;
    let name = line.name.clone();

    let mut cart = session::load_cart(&session).await?;
    cart.add_item(line);
    session::save_cart(&session, &cart).await?;

    add_breadcrumb("cart", "Added item", &[("product_id", product.id.as_str())]);
    let notice = Notice::success(format!("{name} added to cart."));

    if hx.0 {
        return Ok((
            AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
            FlashTemplate {
                notices: vec![notice],
            },
        )
            .into_response());
    }

    notice.stash(&session).await;
    Ok(Redirect::to("/cart").into_response())
}

/// Increase a line's quantity by one.
#[instrument(skip(session, hx))]
pub async fn increase(
    hx: HxRequest,
    session: Session,
    Form(form): Form<CartLineForm>,
) -> Result<Response> {
    let mut cart = session::load_cart(&session).await?;
    cart.increase_quantity(ProductId::new(form.id));
    respond(hx, &session, &cart, None).await
}

/// Decrease a line's quantity by one.
///
/// A line at quantity one is left alone and the visitor is told why.
#[instrument(skip(session, hx))]
pub async fn decrease(
    hx: HxRequest,
    session: Session,
    Form(form): Form<CartLineForm>,
) -> Result<Response> {
    let mut cart = session::load_cart(&session).await?;
    let notice = cart
        .decrease_quantity(ProductId::new(form.id))
        .err()
        .map(|rejection| Notice::error(rejection.to_string()));
    respond(hx, &session, &cart, notice).await
}

/// Remove a line regardless of its quantity.
#[instrument(skip(session, hx))]
pub async fn delete(
    hx: HxRequest,
    session: Session,
    Form(form): Form<CartLineForm>,
) -> Result<Response> {
    let id = ProductId::new(form.id);
    let mut cart = session::load_cart(&session).await?;
    let notice = cart
        .state()
        .get(&id)
        .map(|line| Notice::success(format!("{} removed from cart.", line.name)));
    cart.delete_item(id);
    respond(hx, &session, &cart, notice).await
}

/// Empty the cart.
#[instrument(skip(session, hx))]
pub async fn clear(hx: HxRequest, session: Session) -> Result<Response> {
    let mut cart = session::load_cart(&session).await?;
    cart.clear_cart();
    respond(hx, &session, &cart, Some(Notice::success("Cart cleared."))).await
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<impl IntoResponse> {
    let cart = session::load_cart(&session).await?;
    Ok(CartCountTemplate {
        count: cart.state().total_quantity(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lounge_core::{NewLineItem, Price};

    use super::*;

    #[test]
    fn test_cart_view_formats_totals() {
        let mut cart = CartStore::default();
        for _ in 0..2 {
            cart.add_item(NewLineItem {
                id: ProductId::new("a"),
                name: "Stool".to_string(),
                price: Price::from_cents(1000),
                image: None,
                quantity: None,
            });
        }
        cart.add_item(NewLineItem {
            id: ProductId::new("b"),
            name: "Lamp".to_string(),
            price: Price::from_cents(550),
            image: Some("https://cdn.sanity.io/lamp.png".to_string()),
            quantity: None,
        });

        let view = CartView::from(cart.state());
        assert_eq!(view.subtotal, "$25.50");
        assert_eq!(view.item_count, 3);
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.items.first().map(|i| i.line_price.as_str()), Some("$20.00"));
        assert_eq!(view.items.last().map(|i| i.at_minimum), Some(true));
    }

    #[test]
    fn test_rendered_items_fragment_shows_notice() {
        let html = CartItemsTemplate {
            cart: CartView::from(&CartState::default()),
            notices: vec![Notice::error("Stool is already at the minimum quantity of 1")],
        }
        .render()
        .unwrap();
        assert!(html.contains("Your cart is empty."));
        assert!(html.contains("already at the minimum quantity"));
    }
}
