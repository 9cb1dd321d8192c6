//! Storage location enums.

use serde::{Deserialize, Serialize};

/// Physical storage location of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StorageType {
    /// Refrigerator.
    #[default]
    #[serde(rename = "frigo")]
    Fridge,
    /// Pantry.
    #[serde(rename = "dispensa")]
    Pantry,
}

impl StorageType {
    /// Wire value, as stored by the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fridge => "frigo",
            Self::Pantry => "dispensa",
        }
    }

    /// Human-readable label shown on product cards.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fridge => "Frigorifero",
            Self::Pantry => "Dispensa",
        }
    }
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StorageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "frigo" | "fridge" => Ok(Self::Fridge),
            "dispensa" | "pantry" => Ok(Self::Pantry),
            _ => Err(format!("invalid storage type: {s}")),
        }
    }
}

/// Dashboard filter over storage locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StorageFilter {
    /// Show everything.
    #[default]
    All,
    /// Show only products stored in one location.
    Only(StorageType),
}

impl StorageFilter {
    /// Whether a product stored in `storage` passes this filter.
    #[must_use]
    pub fn matches(self, storage: StorageType) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == storage,
        }
    }
}

impl std::str::FromStr for StorageFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" | "tutto" => Ok(Self::All),
            other => other.parse().map(Self::Only),
        }
    }
}
