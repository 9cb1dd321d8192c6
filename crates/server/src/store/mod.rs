//! Key-value persistence.
//!
//! The backend's only storage primitive: one JSON document per key, read and
//! replaced wholesale. Two backends are available:
//!
//! - [`MemoryStore`] - process-local map, used when no database is configured
//!   and in tests
//! - [`PgStore`] - `PostgreSQL` table `kv_store(key TEXT PRIMARY KEY, value JSONB)`
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p dispensa-cli -- migrate
//! ```

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{PgStore, create_pool, run_migrations};

use serde_json::Value;
use thiserror::Error;

/// Errors from the key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored document does not have the expected shape.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// The configured key-value backend.
#[derive(Debug)]
pub enum Store {
    Memory(MemoryStore),
    Postgres(PgStore),
}

impl Store {
    /// An empty in-memory store.
    #[must_use]
    pub fn memory() -> Self {
        Self::Memory(MemoryStore::default())
    }

    /// Name of the backend, for logs.
    #[must_use]
    pub const fn backend(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Postgres(_) => "postgres",
        }
    }

    /// Read the document stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the backend query fails.
    pub async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        match self {
            Self::Memory(store) => Ok(store.get(key).await),
            Self::Postgres(store) => store.get(key).await,
        }
    }

    /// Replace the document stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the backend write fails.
    pub async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => {
                store.set(key, value).await;
                Ok(())
            }
            Self::Postgres(store) => store.set(key, value).await,
        }
    }

    /// Check that the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the database cannot be queried.
    pub async fn ping(&self) -> Result<(), StoreError> {
        match self {
            Self::Memory(_) => Ok(()),
            Self::Postgres(store) => store.ping().await,
        }
    }
}
