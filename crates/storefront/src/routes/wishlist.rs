//! Wishlist route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use lounge_core::{ProductId, WishlistItem, WishlistState};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::HxRequest;
use crate::models::{Notice, notice, session};
use crate::routes::cart::FlashTemplate;
use crate::state::AppState;

/// HTMX event fired whenever the wishlist changes.
pub const WISHLIST_UPDATED_EVENT: &str = "wishlist-updated";

/// Saved item display data for templates.
#[derive(Clone)]
pub struct WishlistItemView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image: Option<String>,
}

impl From<&WishlistItem> for WishlistItemView {
    fn from(item: &WishlistItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            price: item.price.display(),
            image: Some(item.image.clone()).filter(|url| !url.is_empty()),
        }
    }
}

fn views(wishlist: &WishlistState) -> Vec<WishlistItemView> {
    wishlist.items().iter().map(WishlistItemView::from).collect()
}

/// Form naming a single product.
#[derive(Debug, Deserialize)]
pub struct WishlistForm {
    pub id: String,
}

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "wishlist/show.html")]
pub struct WishlistShowTemplate {
    pub items: Vec<WishlistItemView>,
    pub notices: Vec<Notice>,
}

/// Wishlist grid fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/wishlist_items.html")]
pub struct WishlistItemsTemplate {
    pub items: Vec<WishlistItemView>,
    pub notices: Vec<Notice>,
}

/// Display wishlist page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<impl IntoResponse> {
    let wishlist = session::load_wishlist(&session).await?;
    let notices = notice::take_all(&session).await;

    Ok(WishlistShowTemplate {
        items: views(wishlist.state()),
        notices,
    })
}

/// Save a product for later. Saving it twice keeps a single entry.
#[instrument(skip(state, session, hx))]
pub async fn add(
    State(state): State<AppState>,
    hx: HxRequest,
    session: Session,
    Form(form): Form<WishlistForm>,
) -> Result<Response> {
    let product = state.content().product(&ProductId::new(form.id)).await?;
    let item = product.to_wishlist_item().ok_or_else(|| {
        AppError::BadRequest(format!("{} is not available", product.display_name()))
    })?;
    let name = item.name.clone();

    let mut wishlist = session::load_wishlist(&session).await?;
    let notice = if wishlist.add_to_wishlist(item) {
        Notice::success(format!("{name} added to wishlist."))
    } else {
        Notice::success(format!("{name} is already in your wishlist."))
    };
    session::save_wishlist(&session, &wishlist).await?;

    if hx.0 {
        return Ok((
            AppendHeaders([("HX-Trigger", WISHLIST_UPDATED_EVENT)]),
            FlashTemplate {
                notices: vec![notice],
            },
        )
            .into_response());
    }

    notice.stash(&session).await;
    Ok(Redirect::to("/wishlist").into_response())
}

/// Remove a saved product.
#[instrument(skip(session, hx))]
pub async fn remove(
    hx: HxRequest,
    session: Session,
    Form(form): Form<WishlistForm>,
) -> Result<Response> {
    let mut wishlist = session::load_wishlist(&session).await?;
    let notice = wishlist
        .remove_from_wishlist(ProductId::new(form.id))
        .map(|item| Notice::success(format!("{} removed from wishlist.", item.name)));
    session::save_wishlist(&session, &wishlist).await?;

    if hx.0 {
        return Ok((
            AppendHeaders([("HX-Trigger", WISHLIST_UPDATED_EVENT)]),
            WishlistItemsTemplate {
                items: views(wishlist.state()),
                notices: notice.into_iter().collect(),
            },
        )
            .into_response());
    }

    if let Some(notice) = notice {
        notice.stash(&session).await;
    }
    Ok(Redirect::to("/wishlist").into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lounge_core::Price;

    use super::*;

    #[test]
    fn test_empty_image_renders_placeholder() {
        let view = WishlistItemView::from(&WishlistItem {
            id: ProductId::new("a"),
            name: "Lamp".to_string(),
            price: Price::from_cents(4999),
            image: String::new(),
        });
        assert!(view.image.is_none());
        assert_eq!(view.price, "$49.99");
    }

    #[test]
    fn test_empty_wishlist_invites_browsing() {
        let html = WishlistItemsTemplate {
            items: Vec::new(),
            notices: Vec::new(),
        }
        .render()
        .unwrap();
        assert!(html.contains("Your wishlist is empty."));
    }
}
