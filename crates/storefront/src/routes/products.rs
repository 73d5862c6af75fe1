//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lounge_core::ProductId;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::models::{Notice, notice};
use crate::sanity::{ContentError, Product};
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    /// Pre-discount price, set only when a discount applies.
    pub original_price: Option<String>,
    pub rating: Option<String>,
    pub sizes: String,
    pub tags: Vec<String>,
    pub image: Option<String>,
    /// Unpriced products cannot be added to the cart or wishlist.
    pub purchasable: bool,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        let rating = product.rating.map(|rating| {
            let count = product.rating_count.unwrap_or(0);
            format!("{} ★ ({count} reviews)", rating.normalize())
        });

        Self {
            id: product.id.to_string(),
            name: product.display_name().to_owned(),
            description: product.description.clone().unwrap_or_default(),
            price: product.price_display(),
            original_price: product.original_price().map(|p| p.display()),
            rating,
            sizes: product.sizes.join(", "),
            tags: product.tags.clone(),
            image: product.image.clone(),
            purchasable: product.price().is_some(),
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
    pub notices: Vec<Notice>,
}

/// Product not found page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/not_found.html")]
pub struct ProductNotFoundTemplate {
    pub notices: Vec<Notice>,
}

/// Display product detail page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response> {
    let notices = notice::take_all(&session).await;

    match state.content().product(&ProductId::new(id)).await {
        Ok(product) => Ok(ProductShowTemplate {
            product: ProductView::from(&product),
            notices,
        }
        .into_response()),
        Err(ContentError::NotFound(_)) => Ok((
            StatusCode::NOT_FOUND,
            ProductNotFoundTemplate { notices },
        )
            .into_response()),
        Err(e) => Err(e.into()),
    }
}
