//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::models::{Notice, notice};
use crate::routes::products::ProductView;
use crate::state::AppState;

/// Home page template: the product grid.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub products: Vec<ProductView>,
    pub notices: Vec<Notice>,
}

/// Display the home page.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let products = state.content().products().await?;
    let notices = notice::take_all(&session).await;

    Ok(HomeTemplate {
        products: products.iter().map(ProductView::from).collect(),
        notices,
    })
}
