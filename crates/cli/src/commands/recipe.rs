//! Recipe suggestion command.

use std::error::Error;

use dispensa_cli::recipe::{RecipeClient, RetryPolicy};
use dispensa_core::ProductId;

use super::Context;

#[allow(clippy::print_stdout)]
pub async fn suggest(ctx: &Context, ids: &[String]) -> Result<(), Box<dyn Error>> {
    let mut dashboard = ctx.dashboard()?;
    dashboard.load_products().await?;

    let ids: Vec<ProductId> = ids.iter().map(ProductId::new).collect();
    let client = RecipeClient::new(ctx.config.gemini.clone(), RetryPolicy::default())?;
    let recipe = dashboard.suggest_recipe(&client, &ids).await?;

    println!("{}", recipe.title);
    println!("Difficoltà: {}  Tempo: {}", recipe.difficulty, recipe.time);
    println!();
    println!("{}", recipe.procedure);
    Ok(())
}
