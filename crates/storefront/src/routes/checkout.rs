//! Checkout route handlers.
//!
//! The contact form posts back to `/checkout`. A valid submission is sent to
//! the order endpoint exactly once; the cart is only cleared after the
//! endpoint accepts the order.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use lounge_core::{
    CartState, ContactDetails, ContactErrors, LineItem, OrderSubmission, PlacedOrder, UserId,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::RequestId;
use crate::models::{Notice, notice, session};
use crate::routes::cart::CartView;
use crate::state::AppState;

const SUBMISSION_FAILED: &str = "Failed to place the order. Please try again.";

/// Checkout contact form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/form.html")]
pub struct CheckoutFormTemplate {
    pub cart: CartView,
    pub form: CheckoutForm,
    pub errors: ContactErrors,
    pub notices: Vec<Notice>,
}

/// Line of the confirmed order.
#[derive(Clone)]
pub struct ConfirmedItemView {
    pub name: String,
    pub quantity: u32,
    pub line_price: String,
}

impl From<&LineItem> for ConfirmedItemView {
    fn from(line: &LineItem) -> Self {
        Self {
            name: line.name.clone(),
            quantity: line.quantity.get(),
            line_price: line.line_total().display(),
        }
    }
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmation.html")]
pub struct ConfirmationTemplate {
    pub order_id: String,
    pub name: String,
    pub email: String,
    pub address: String,
    pub items: Vec<ConfirmedItemView>,
    pub total: String,
    pub notices: Vec<Notice>,
}

impl From<PlacedOrder> for ConfirmationTemplate {
    fn from(order: PlacedOrder) -> Self {
        Self {
            order_id: order.id.to_string(),
            total: order.total().display(),
            items: order.cart_items.iter().map(ConfirmedItemView::from).collect(),
            name: order.name,
            email: order.email,
            address: order.address,
            notices: Vec::new(),
        }
    }
}

fn form_page(
    cart: &CartState,
    form: CheckoutForm,
    errors: ContactErrors,
    notices: Vec<Notice>,
) -> CheckoutFormTemplate {
    CheckoutFormTemplate {
        cart: CartView::from(cart),
        form,
        errors,
        notices,
    }
}

async fn empty_cart_redirect(session: &Session) -> Response {
    Notice::error("Your cart is empty.").stash(session).await;
    Redirect::to("/cart").into_response()
}

/// Display the checkout form.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Response> {
    let cart = session::load_cart(&session).await?;
    if cart.state().is_empty() {
        return Ok(empty_cart_redirect(&session).await);
    }

    let notices = notice::take_all(&session).await;
    Ok(form_page(cart.state(), CheckoutForm::default(), ContactErrors::default(), notices)
        .into_response())
}

/// Validate the contact form and place the order.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let mut cart = session::load_cart(&session).await?;

    let contact = match ContactDetails::parse(&form.name, &form.email, &form.address) {
        Ok(contact) => contact,
        Err(errors) => {
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                form_page(cart.state(), form, errors, Vec::new()),
            )
                .into_response());
        }
    };

    let user_id = UserId::new(state.config().user_id.clone());
    let Ok(submission) = OrderSubmission::new(contact, user_id, cart.state()) else {
        return Ok(empty_cart_redirect(&session).await);
    };

    match state.orders().submit(&submission).await {
        Ok(confirmation) => {
            let order = confirmation.reconcile(&submission);
            tracing::info!(order_id = %order.id, lines = order.cart_items.len(), "Order placed");
            add_breadcrumb("checkout", "Order placed", &[("order_id", order.id.as_str())]);

            cart.clear_cart();
            session::save_cart(&session, &cart).await?;
            Ok(ConfirmationTemplate::from(order).into_response())
        }
        Err(e) => {
            tracing::error!(error = %e, %request_id, "Order submission failed");
            sentry::capture_error(&e);

            let notices = vec![Notice::error(SUBMISSION_FAILED)];
            Ok((
                StatusCode::BAD_GATEWAY,
                form_page(cart.state(), form, ContactErrors::default(), notices),
            )
                .into_response())
        }
    }
}
