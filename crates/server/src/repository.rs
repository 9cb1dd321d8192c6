//! Per-user record lists on top of the key-value store.
//!
//! Each user owns two lists, stored as JSON arrays under
//! `products_<username>` and `shopping_<username>`. Records are opaque JSON:
//! the server only looks at their `id` field and at the single field a PUT
//! replaces. Every mutation is a read-modify-write of the whole array with no
//! locking, so concurrent writers for the same user may lose updates.

use serde_json::Value;

use crate::store::{Store, StoreError};

/// Which of a user's two lists an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Products,
    Shopping,
}

impl ListKind {
    /// Store key prefix, joined to the username with `_`.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Shopping => "shopping",
        }
    }

    /// The one field PUT is allowed to overwrite.
    #[must_use]
    pub const fn patch_field(self) -> &'static str {
        match self {
            Self::Products => "quantity",
            Self::Shopping => "completed",
        }
    }

    /// Build the store key for `username`.
    #[must_use]
    pub fn key(self, username: &str) -> String {
        format!("{}_{username}", self.prefix())
    }
}

/// Does `record` carry this id?
///
/// Ids are compared as text so a numeric id written by an older client still
/// matches its path segment.
fn has_id(record: &Value, id: &str) -> bool {
    match record.get("id") {
        Some(Value::String(s)) => s == id,
        Some(Value::Number(n)) => n.to_string() == id,
        _ => false,
    }
}

/// A user's list of records in the store.
pub struct RecordList<'a> {
    store: &'a Store,
    key: String,
}

impl<'a> RecordList<'a> {
    #[must_use]
    pub fn new(store: &'a Store, kind: ListKind, username: &str) -> Self {
        Self {
            store,
            key: kind.key(username),
        }
    }

    /// All records, in insertion order. A key never written reads as empty.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DataCorruption` if the stored value is not an array.
    pub async fn list(&self) -> Result<Vec<Value>, StoreError> {
        match self.store.get(&self.key).await? {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(records)) => Ok(records),
            Some(other) => Err(StoreError::DataCorruption(format!(
                "{} holds a {} instead of an array",
                self.key,
                json_type(&other)
            ))),
        }
    }

    /// Append `record` at the end of the list, unchanged.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the list cannot be read or written.
    pub async fn append(&self, record: Value) -> Result<(), StoreError> {
        let mut records = self.list().await?;
        records.push(record);
        self.store.set(&self.key, Value::Array(records)).await
    }

    /// Set `field` to `value` on every record whose id matches.
    ///
    /// Returns how many records changed. An unknown id is not an error and the
    /// list is written back untouched.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the list cannot be read or written.
    pub async fn patch(&self, id: &str, field: &str, value: &Value) -> Result<usize, StoreError> {
        let mut records = self.list().await?;
        let mut changed = 0;
        for record in &mut records {
            if !has_id(record, id) {
                continue;
            }
            if let Value::Object(fields) = record {
                fields.insert(field.to_owned(), value.clone());
                changed += 1;
            }
        }
        self.store.set(&self.key, Value::Array(records)).await?;
        Ok(changed)
    }

    /// Drop every record whose id matches. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the list cannot be read or written.
    pub async fn remove(&self, id: &str) -> Result<usize, StoreError> {
        let mut records = self.list().await?;
        let before = records.len();
        records.retain(|record| !has_id(record, id));
        let removed = before - records.len();
        self.store.set(&self.key, Value::Array(records)).await?;
        Ok(removed)
    }
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
