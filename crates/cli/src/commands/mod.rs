//! Subcommand implementations.
//!
//! Each command reads from the content API with the storefront's own
//! [`ContentClient`](lounge_storefront::sanity::ContentClient) and reports
//! through `tracing`.

pub mod orders;
pub mod products;

use lounge_storefront::config::ConfigError;
use lounge_storefront::sanity::ContentError;

/// Errors surfaced by CLI commands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("content API error: {0}")]
    Content(#[from] ContentError),
}
