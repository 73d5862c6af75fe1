//! Catalog inspection commands.
//!
//! # Usage
//!
//! ```bash
//! # One line per product
//! lounge-cli products list
//!
//! # Everything the detail page shows
//! lounge-cli products show <id>
//! ```

use lounge_core::ProductId;
use lounge_storefront::sanity::{ContentClient, Product};

use super::CommandError;

/// Log one summary line per product.
///
/// # Errors
///
/// Returns an error if the content API request fails.
pub async fn list(client: &ContentClient) -> Result<(), CommandError> {
    let products = client.products().await?;

    for product in products.iter() {
        tracing::info!("{}", summary_line(product));
    }
    tracing::info!(count = products.len(), "Listed products");
    Ok(())
}

/// Log the full record of one product.
///
/// # Errors
///
/// Returns an error if the product does not exist or the request fails.
pub async fn show(client: &ContentClient, id: &str) -> Result<(), CommandError> {
    let product = client.product(&ProductId::new(id)).await?;

    for line in detail_lines(&product) {
        tracing::info!("{line}");
    }
    Ok(())
}

fn summary_line(product: &Product) -> String {
    format!(
        "{:<24} {:<32} {}",
        product.id.as_str(),
        product.display_name(),
        product.price_display()
    )
}

fn detail_lines(product: &Product) -> Vec<String> {
    let mut lines = vec![
        format!("id:          {}", product.id),
        format!("name:        {}", product.display_name()),
        format!("price:       {}", product.price_display()),
    ];
    if let Some(original) = product.original_price() {
        lines.push(format!("was:         {original}"));
    }
    if let Some(rating) = product.rating {
        lines.push(format!(
            "rating:      {} ({} reviews)",
            rating.normalize(),
            product.rating_count.unwrap_or(0)
        ));
    }
    if !product.sizes.is_empty() {
        lines.push(format!("sizes:       {}", product.sizes.join(", ")));
    }
    if !product.tags.is_empty() {
        lines.push(format!("tags:        {}", product.tags.join(", ")));
    }
    if let Some(description) = &product.description {
        lines.push(format!("description: {description}"));
    }
    lines
}
