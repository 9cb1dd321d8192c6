//! Dispensa CLI - Household fridge and pantry tracker.
//!
//! # Usage
//!
//! ```bash
//! # Log in (just a username, remembered between runs)
//! dispensa login mario
//!
//! # Inventory sorted by expiry, optionally for one storage location
//! dispensa list --storage frigo
//!
//! # Add a product; the expiry accepts 2024-01-31 or 31/01/2024
//! dispensa add --name Latte --category Latticini --quantity 2 --unit l --expiry 31/01/2024
//!
//! # Add by barcode (name from Open Food Facts) with a photo
//! dispensa add --barcode 8001505005707 --expiry 20240131 --image latte.jpg
//!
//! # Quantities
//! dispensa inc 1702600000000
//! dispensa dec 1702600000000
//!
//! # Shopping list
//! dispensa shopping add Uova --quantity 6
//! dispensa shopping toggle 1702600000001
//!
//! # Recipe from selected products
//! dispensa recipe 1702600000000 1702600000002
//!
//! # Create the kv_store table
//! dispensa migrate
//! ```
//!
//! # Commands
//!
//! - `login` / `logout` / `whoami` - Session
//! - `list`, `add`, `inc`, `dec`, `set-qty`, `delete` - Inventory
//! - `shopping` - Shopping list
//! - `recipe` - Recipe suggestion
//! - `categories` - Preset categories and units
//! - `migrate` - Run database migrations

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dispensa_core::{StorageFilter, StorageType, Unit};
use rust_decimal::Decimal;

mod commands;

#[derive(Parser)]
#[command(name = "dispensa")]
#[command(author, version, about = "Frigorifero & Dispensa - fridge and pantry tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Remember a username for the following commands
    Login {
        username: String,
    },
    /// Forget the current username
    Logout,
    /// Show the current username
    Whoami,
    /// List products, soonest expiry first
    List {
        /// all, frigo or dispensa
        #[arg(short, long, default_value = "all")]
        storage: StorageFilter,
    },
    /// Add a product
    Add(AddArgs),
    /// Add one unit to a product
    Inc {
        id: String,
    },
    /// Remove one unit from a product (never below zero)
    Dec {
        id: String,
    },
    /// Set a product's quantity
    SetQty {
        id: String,
        quantity: Decimal,
    },
    /// Delete a product
    Delete {
        id: String,
    },
    /// Manage the shopping list
    Shopping {
        #[command(subcommand)]
        action: ShoppingAction,
    },
    /// Suggest a recipe using the given products
    Recipe {
        /// Product ids
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Show preset categories and units
    Categories,
    /// Run database migrations
    Migrate,
}

#[derive(clap::Args)]
struct AddArgs {
    /// Product name (optional with --barcode)
    #[arg(short, long, default_value = "")]
    name: String,

    #[arg(short, long, default_value = "Latticini")]
    category: String,

    #[arg(short, long, default_value = "1")]
    quantity: Decimal,

    /// pz, kg, g, l, ml, confezioni
    #[arg(short, long, default_value = "pz")]
    unit: Unit,

    /// YYYY-MM-DD or dd/mm/yyyy (digits only also work)
    #[arg(short, long)]
    expiry: Option<String>,

    /// frigo or dispensa
    #[arg(short, long, default_value = "frigo")]
    storage: StorageType,

    /// Photo to attach
    #[arg(long)]
    image: Option<PathBuf>,

    /// Barcode; the name is looked up on Open Food Facts
    #[arg(short, long)]
    barcode: Option<String>,

    /// Scan the barcode with a camera
    #[arg(long, conflicts_with = "barcode")]
    camera: bool,
}

#[derive(Subcommand)]
enum ShoppingAction {
    /// Show active and completed items
    List,
    /// Add an item
    Add {
        name: String,
        /// Free text, e.g. "2 kg"
        #[arg(short, long)]
        quantity: Option<String>,
    },
    /// Flip an item between active and completed
    Toggle {
        id: String,
    },
    /// Delete an item
    Delete {
        id: String,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output stays clean
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if matches!(cli.command, Commands::Migrate) {
        return commands::migrate::run().await;
    }

    let ctx = commands::Context::from_env()?;

    match cli.command {
        Commands::Login { username } => commands::session::login(&ctx, &username)?,
        Commands::Logout => commands::session::logout(&ctx)?,
        Commands::Whoami => commands::session::whoami(&ctx)?,
        Commands::List { storage } => commands::inventory::list(&ctx, storage).await?,
        Commands::Add(args) => {
            let input = commands::inventory::AddInput {
                name: args.name,
                category: args.category,
                quantity: args.quantity,
                unit: args.unit,
                expiry: args.expiry,
                storage: args.storage,
                image: args.image,
                barcode: args.barcode,
                camera: args.camera,
            };
            commands::inventory::add(&ctx, input).await?;
        }
        Commands::Inc { id } => commands::inventory::increment(&ctx, &id).await?,
        Commands::Dec { id } => commands::inventory::decrement(&ctx, &id).await?,
        Commands::SetQty { id, quantity } => {
            commands::inventory::set_quantity(&ctx, &id, quantity).await?;
        }
        Commands::Delete { id } => commands::inventory::delete(&ctx, &id).await?,
        Commands::Shopping { action } => match action {
            ShoppingAction::List => commands::shopping::list(&ctx).await?,
            ShoppingAction::Add { name, quantity } => {
                commands::shopping::add(&ctx, &name, quantity.as_deref()).await?;
            }
            ShoppingAction::Toggle { id } => commands::shopping::toggle(&ctx, &id).await?,
            ShoppingAction::Delete { id } => commands::shopping::delete(&ctx, &id).await?,
        },
        Commands::Recipe { ids } => commands::recipe::suggest(&ctx, &ids).await?,
        Commands::Categories => commands::inventory::categories(),
        Commands::Migrate => {}
    }
    Ok(())
}
