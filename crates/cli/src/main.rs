//! ATHYRE CLI - Catalog listing and hosted cart tools.
//!
//! # Usage
//!
//! ```bash
//! # List the Rise catalog
//! athyre-cli catalog list
//!
//! # Read a hosted store's cart
//! athyre-cli cart --store athyre.myshopify.com show
//!
//! # Add two of a variant, then keep using the same cart
//! athyre-cli cart add 40123 -q 2
//! athyre-cli cart --cart-token c1-abc change 40123:9f1c 0
//! ```
//!
//! # Commands
//!
//! - `catalog list` - Print the local product catalog
//! - `cart show` - Read the hosted cart (`GET /cart.js`)
//! - `cart add` - Add a variant (`POST /cart/add.js`)
//! - `cart change` - Set a line's quantity (`POST /cart/change.js`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "athyre-cli")]
#[command(author, version, about = "ATHYRE CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the local catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Drive a hosted store's AJAX cart
    Cart {
        /// Store domain, e.g. athyre.myshopify.com
        #[arg(long, env = "ATHYRE_STORE_DOMAIN")]
        store: String,

        /// Resume an existing cart by its token
        #[arg(long, env = "ATHYRE_CART_TOKEN")]
        cart_token: Option<String>,

        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List every product with its sizes and colors
    List,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add a variant to the cart
    Add {
        /// Variant ID
        variant: u64,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity (0 removes it)
    Change {
        /// Line key as shown by `cart show`
        line: String,

        /// New quantity
        quantity: u32,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "athyre_cli=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List => commands::catalog::list(),
        },
        Commands::Cart {
            store,
            cart_token,
            action,
        } => {
            let client = commands::cart::client(&store, cart_token)?;
            match action {
                CartAction::Show => commands::cart::show(&client).await?,
                CartAction::Add { variant, quantity } => {
                    commands::cart::add(&client, variant, quantity).await?;
                }
                CartAction::Change { line, quantity } => {
                    commands::cart::change(&client, &line, quantity).await?;
                }
            }
        }
    }
    Ok(())
}
