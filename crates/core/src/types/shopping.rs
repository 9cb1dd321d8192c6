//! Shopping list items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ShoppingItemId;

/// An entry on the to-buy list, independent of the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    pub id: ShoppingItemId,
    pub name: String,
    /// Free text such as "2 kg" or "una confezione".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default)]
    pub completed: bool,
    pub added_at: DateTime<Utc>,
}

impl ShoppingItem {
    /// Build a new, not yet completed item from form input.
    ///
    /// Returns `None` when the trimmed name is empty. A blank quantity is
    /// dropped.
    #[must_use]
    pub fn new(name: &str, quantity: Option<&str>, added_at: DateTime<Utc>) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let quantity = quantity
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_owned);

        Some(Self {
            id: ShoppingItemId::from_timestamp(added_at),
            name: name.to_owned(),
            quantity,
            completed: false,
            added_at,
        })
    }
}
