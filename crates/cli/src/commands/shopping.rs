//! Shopping list commands.

use std::error::Error;

use chrono::Utc;
use dispensa_core::{ShoppingItem, ShoppingItemId};

use super::Context;

fn item_line(item: &ShoppingItem) -> String {
    let mark = if item.completed { "x" } else { " " };
    match &item.quantity {
        Some(quantity) => format!("[{mark}] {:<16} {} ({quantity})", item.id.as_str(), item.name),
        None => format!("[{mark}] {:<16} {}", item.id.as_str(), item.name),
    }
}

#[allow(clippy::print_stdout)]
pub async fn list(ctx: &Context) -> Result<(), Box<dyn Error>> {
    let mut dashboard = ctx.dashboard()?;
    dashboard.load_shopping_list().await?;

    if dashboard.shopping_items().is_empty() {
        println!("La lista della spesa è vuota.");
        return Ok(());
    }

    println!("Da comprare:");
    for item in dashboard.active_items() {
        println!("{}", item_line(item));
    }
    let completed: Vec<_> = dashboard.completed_items().collect();
    if !completed.is_empty() {
        println!("Completati ({}):", completed.len());
        for item in completed {
            println!("{}", item_line(item));
        }
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn add(ctx: &Context, name: &str, quantity: Option<&str>) -> Result<(), Box<dyn Error>> {
    let mut dashboard = ctx.dashboard()?;
    let item = dashboard.add_shopping_item(name, quantity, Utc::now()).await?;
    println!("{}", item_line(&item));
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn toggle(ctx: &Context, id: &str) -> Result<(), Box<dyn Error>> {
    let mut dashboard = ctx.dashboard()?;
    dashboard.load_shopping_list().await?;
    let completed = dashboard
        .toggle_shopping_item(&ShoppingItemId::new(id))
        .await?;
    let state = if completed { "completato" } else { "da comprare" };
    println!("{id}: {state}");
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn delete(ctx: &Context, id: &str) -> Result<(), Box<dyn Error>> {
    let mut dashboard = ctx.dashboard()?;
    dashboard
        .delete_shopping_item(&ShoppingItemId::new(id))
        .await?;
    println!("Eliminato {id}");
    Ok(())
}
