//! Process-local key-value store.

use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::RwLock;

/// In-memory map guarded by an async `RwLock`.
///
/// The lock is held for a single get or set, never across a handler's
/// read-modify-write, matching the database-backed store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub async fn get(&self, key: &str) -> Option<Value> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn set(&self, key: &str, value: Value) {
        self.entries.write().await.insert(key.to_owned(), value);
    }
}
