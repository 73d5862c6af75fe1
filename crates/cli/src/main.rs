//! Lounge CLI - Catalog and sales inspection tools.
//!
//! # Usage
//!
//! ```bash
//! # List every product with its price
//! lounge-cli products list
//!
//! # Show one product
//! lounge-cli products show sofa-1
//!
//! # Revenue, units and order count
//! lounge-cli orders summary
//! ```
//!
//! Reads the same `SANITY_*` environment variables (and `.env`) as the
//! storefront.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use lounge_storefront::config::SanityConfig;
use lounge_storefront::sanity::ContentClient;

mod commands;

#[derive(Parser)]
#[command(name = "lounge-cli")]
#[command(author, version, about = "Lounge CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the product catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Report on recorded orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List all products
    List,
    /// Show a single product
    Show {
        /// Product document ID
        id: String,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// Total revenue, items sold and order count
    Summary,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let client = ContentClient::new(&SanityConfig::from_env()?)?;

    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List => commands::products::list(&client).await?,
            ProductsAction::Show { id } => commands::products::show(&client, &id).await?,
        },
        Commands::Orders { action } => match action {
            OrdersAction::Summary => commands::orders::summary(&client).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_products_show() {
        let cli = Cli::try_parse_from(["lounge-cli", "products", "show", "sofa-1"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Products { action: ProductsAction::Show { id } }) if id == "sofa-1"
        ));
    }
}
