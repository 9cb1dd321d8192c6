//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! dispensa migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DISPENSA_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//!
//! # Migration Files
//!
//! `crates/server/migrations/`, embedded at compile time.

use std::error::Error;

use dispensa_server::store::{create_pool, run_migrations};
use secrecy::SecretString;

/// Errors specific to the migrate command.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Missing environment variable: DISPENSA_DATABASE_URL or DATABASE_URL")]
    MissingDatabaseUrl,
}

/// Run the server's migrations against the configured database.
#[allow(clippy::print_stdout)]
pub async fn run() -> Result<(), Box<dyn Error>> {
    let _ = dotenvy::dotenv();

    let database_url = std::env::var("DISPENSA_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from)
        .ok_or(MigrationError::MissingDatabaseUrl)?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    run_migrations(&pool).await?;

    println!("Migrations complete.");
    Ok(())
}
