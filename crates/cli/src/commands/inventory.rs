//! Inventory commands: list, add, quantity changes and delete.

use std::error::Error;
use std::path::PathBuf;

use chrono::{Local, NaiveDate, Utc};
use dispensa_cli::barcode::{OpenFoodFactsClient, ProductInfo, normalize_barcode, resolve_name};
use dispensa_cli::capture::{CaptureBackend, image_from_file};
use dispensa_core::date_entry::parse_date_input;
use dispensa_core::expiry::{ExpiryStatus, Urgency};
use dispensa_core::{CATEGORIES, Product, ProductDraft, ProductId, StorageFilter, StorageType, Unit};
use rust_decimal::Decimal;

use super::Context;

/// Flags of `dispensa add`.
pub struct AddInput {
    pub name: String,
    pub category: String,
    pub quantity: Decimal,
    pub unit: Unit,
    pub expiry: Option<String>,
    pub storage: StorageType,
    pub image: Option<PathBuf>,
    pub barcode: Option<String>,
    pub camera: bool,
}

const fn urgency_marker(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Expired => "!!",
        Urgency::Critical => "! ",
        Urgency::Warning => "~ ",
        Urgency::Fresh => "  ",
    }
}

/// One product card as a line of text.
fn product_line(product: &Product, today: NaiveDate) -> String {
    let days = product.days_until_expiry(today);
    format!(
        "{} {:<16} {:<24} {} {:<11} {:<18} {}",
        urgency_marker(Urgency::from_days(days)),
        product.id.as_str(),
        product.name,
        product.quantity.normalize(),
        product.unit.as_str(),
        product.category,
        ExpiryStatus::from_days(days).label(),
    )
}

#[allow(clippy::print_stdout)]
pub async fn list(ctx: &Context, storage: StorageFilter) -> Result<(), Box<dyn Error>> {
    let mut dashboard = ctx.dashboard()?;
    dashboard.set_filter(storage);
    // A failed load shows the error banner over an empty list
    let _ = dashboard.load_products().await;

    let counts = dashboard.counts();
    println!(
        "{}: {} in frigo, {} in dispensa",
        dashboard.user(),
        counts.fridge,
        counts.pantry
    );
    if let Some(error) = dashboard.error() {
        println!("{error}");
    }

    let today = Local::now().date_naive();
    let visible = dashboard.visible_products(today);
    if visible.is_empty() {
        println!("Nessun prodotto.");
        return Ok(());
    }
    for product in &visible {
        println!("{}", product_line(product, today));
    }
    Ok(())
}

async fn lookup_barcode(ctx: &Context, barcode: &str) -> Result<ProductInfo, Box<dyn Error>> {
    let client = OpenFoodFactsClient::new(ctx.config.openfoodfacts_url.clone())?;
    Ok(client.lookup(barcode).await?)
}

#[allow(clippy::print_stdout)]
pub async fn add(ctx: &Context, input: AddInput) -> Result<(), Box<dyn Error>> {
    if input.camera {
        CaptureBackend::LiveCamera.ensure_available()?;
    }

    let mut draft = ProductDraft {
        name: input.name,
        category: input.category,
        quantity: input.quantity,
        unit: input.unit,
        storage_type: input.storage,
        ..ProductDraft::default()
    };

    if let Some(raw) = input.barcode.as_deref() {
        let barcode = normalize_barcode(raw)?;
        // Lookup failures leave the typed name in place
        let info = match lookup_barcode(ctx, &barcode).await {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!(error = %e, barcode = %barcode, "Barcode lookup failed");
                ProductInfo::default()
            }
        };
        if !info.found {
            println!("Prodotto non trovato nel database.");
        }
        draft.name = resolve_name(&info, &draft.name, &barcode);
        draft.barcode = Some(barcode);
    }

    if let Some(expiry) = input.expiry.as_deref() {
        draft.expiry_date = Some(parse_date_input(expiry)?);
    }

    if let Some(path) = input.image.as_deref() {
        draft.image = Some(image_from_file(path)?);
    }

    let mut dashboard = ctx.dashboard()?;
    let product = dashboard.add_product(draft, Utc::now()).await?;
    println!(
        "Aggiunto {} ({}) in {}",
        product.name,
        product.id,
        product.storage_type.label()
    );
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn increment(ctx: &Context, id: &str) -> Result<(), Box<dyn Error>> {
    let mut dashboard = ctx.dashboard()?;
    dashboard.load_products().await?;
    let quantity = dashboard.increment(&ProductId::new(id)).await?;
    println!("{id}: {}", quantity.normalize());
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn decrement(ctx: &Context, id: &str) -> Result<(), Box<dyn Error>> {
    let mut dashboard = ctx.dashboard()?;
    dashboard.load_products().await?;
    let quantity = dashboard.decrement(&ProductId::new(id)).await?;
    println!("{id}: {}", quantity.normalize());
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn set_quantity(ctx: &Context, id: &str, quantity: Decimal) -> Result<(), Box<dyn Error>> {
    let mut dashboard = ctx.dashboard()?;
    dashboard.load_products().await?;
    dashboard.update_quantity(&ProductId::new(id), quantity).await?;
    println!("{id}: {}", quantity.normalize());
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn delete(ctx: &Context, id: &str) -> Result<(), Box<dyn Error>> {
    let mut dashboard = ctx.dashboard()?;
    dashboard.delete_product(&ProductId::new(id)).await?;
    println!("Eliminato {id}");
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn categories() {
    println!("Categorie:");
    for category in CATEGORIES {
        println!("  {category}");
    }
    println!("Unità:");
    for unit in Unit::ALL {
        println!("  {unit}");
    }
}
