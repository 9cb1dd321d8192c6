//! Inventory products.
//!
//! A [`Product`] is what the backend stores; a [`ProductDraft`] is the
//! add-product form before submission.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::{ProductId, StorageType, Unit};
use crate::expiry;

/// Preset categories, in the order the add-product form offers them.
///
/// The category field itself is free text; these are suggestions.
pub const CATEGORIES: [&str; 16] = [
    "Latticini",
    "Mozzarella",
    "Provola",
    "Insaccati",
    "Carne",
    "Pesce",
    "Frutta",
    "Verdura",
    "Bevande",
    "Pasta e Riso",
    "Pane e Cereali",
    "Condimenti",
    "Dolci/Brioches",
    "Zucchero",
    "Surgelati",
    "Altro",
];

/// A food item in the fridge or pantry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    /// Never negative; see [`Product::decremented_quantity`].
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    pub unit: Unit,
    pub expiry_date: NaiveDate,
    pub storage_type: StorageType,
    /// Photo as a `data:` URL.
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub barcode: Option<String>,
}

impl Product {
    /// Quantity after pressing "+".
    #[must_use]
    pub fn incremented_quantity(&self) -> Decimal {
        self.quantity + Decimal::ONE
    }

    /// Quantity after pressing "-", clamped at zero.
    #[must_use]
    pub fn decremented_quantity(&self) -> Decimal {
        (self.quantity - Decimal::ONE).max(Decimal::ZERO)
    }

    /// Whole days from `today` until this product expires (negative once expired).
    #[must_use]
    pub fn days_until_expiry(&self, today: NaiveDate) -> i64 {
        expiry::days_until(self.expiry_date, today)
    }
}

/// Errors that prevent a draft from being submitted.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductDraftError {
    #[error("product name is required")]
    MissingName,
    #[error("expiry date is required")]
    MissingExpiryDate,
    #[error("quantity cannot be negative")]
    NegativeQuantity,
}

/// The add-product form, pre-filled with the form's defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub category: String,
    pub quantity: Decimal,
    pub unit: Unit,
    pub expiry_date: Option<NaiveDate>,
    pub storage_type: StorageType,
    pub image: Option<String>,
    pub barcode: Option<String>,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: CATEGORIES[0].to_owned(),
            quantity: Decimal::ONE,
            unit: Unit::default(),
            expiry_date: None,
            storage_type: StorageType::default(),
            image: None,
            barcode: None,
        }
    }
}

impl ProductDraft {
    /// Turn the draft into a product with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank, the expiry date is missing, or
    /// the quantity is negative.
    pub fn into_product(self, id: ProductId) -> Result<Product, ProductDraftError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ProductDraftError::MissingName);
        }
        let expiry_date = self
            .expiry_date
            .ok_or(ProductDraftError::MissingExpiryDate)?;
        if self.quantity < Decimal::ZERO {
            return Err(ProductDraftError::NegativeQuantity);
        }

        Ok(Product {
            id,
            name: name.to_owned(),
            category: self.category,
            quantity: self.quantity,
            unit: self.unit,
            expiry_date,
            storage_type: self.storage_type,
            image: self.image.filter(|s| !s.is_empty()),
            barcode: self.barcode.filter(|s| !s.is_empty()),
        })
    }
}

/// The web form posts `""` for an absent photo or barcode.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample(quantity: Decimal) -> Product {
        Product {
            id: ProductId::new("1"),
            name: "Latte".to_string(),
            category: "Latticini".to_string(),
            quantity,
            unit: Unit::L,
            expiry_date: date("2024-01-10"),
            storage_type: StorageType::Fridge,
            image: None,
            barcode: None,
        }
    }

    #[test]
    fn test_decrement_clamps_at_zero() {
        assert_eq!(sample(Decimal::ONE).decremented_quantity(), Decimal::ZERO);
        assert_eq!(sample(Decimal::ZERO).decremented_quantity(), Decimal::ZERO);
        assert_eq!(
            sample(Decimal::new(5, 1)).decremented_quantity(),
            Decimal::ZERO
        );
        assert_eq!(
            sample(Decimal::new(25, 1)).decremented_quantity(),
            Decimal::new(15, 1)
        );
    }

    #[test]
    fn test_increment_adds_one() {
        assert_eq!(
            sample(Decimal::ZERO).incremented_quantity(),
            Decimal::ONE
        );
    }

    #[test]
    fn test_deserialize_web_client_payload() {
        let value = json!({
            "id": "1704067200000",
            "name": "Mozzarella di bufala",
            "category": "Mozzarella",
            "quantity": 2,
            "unit": "pz",
            "expiryDate": "2024-01-05",
            "storageType": "frigo",
            "image": "",
            "barcode": "8001234567890"
        });

        let product: Product = serde_json::from_value(value).unwrap();
        assert_eq!(product.quantity, Decimal::from(2));
        assert_eq!(product.unit, Unit::Pz);
        assert_eq!(product.storage_type, StorageType::Fridge);
        assert_eq!(product.image, None);
        assert_eq!(product.barcode.as_deref(), Some("8001234567890"));
    }

    #[test]
    fn test_serialize_uses_camel_case_and_numbers() {
        let value = serde_json::to_value(sample(Decimal::new(15, 1))).unwrap();
        assert_eq!(value["expiryDate"], "2024-01-10");
        assert_eq!(value["storageType"], "frigo");
        assert_eq!(value["quantity"], json!(1.5));
        assert!(value.get("image").is_none());
    }

    #[test]
    fn test_draft_defaults() {
        let draft = ProductDraft::default();
        assert_eq!(draft.category, "Latticini");
        assert_eq!(draft.quantity, Decimal::ONE);
        assert_eq!(draft.unit, Unit::Pz);
        assert_eq!(draft.storage_type, StorageType::Fridge);
    }

    #[test]
    fn test_draft_requires_name_and_expiry() {
        let draft = ProductDraft {
            name: "  ".to_string(),
            expiry_date: Some(date("2024-01-01")),
            ..ProductDraft::default()
        };
        assert_eq!(
            draft.into_product(ProductId::new("1")),
            Err(ProductDraftError::MissingName)
        );

        let draft = ProductDraft {
            name: "Pane".to_string(),
            ..ProductDraft::default()
        };
        assert_eq!(
            draft.into_product(ProductId::new("1")),
            Err(ProductDraftError::MissingExpiryDate)
        );
    }

    #[test]
    fn test_draft_keeps_quantity_and_unit() {
        let draft = ProductDraft {
            name: " Riso ".to_string(),
            quantity: Decimal::new(500, 0),
            unit: Unit::G,
            expiry_date: Some(date("2025-06-01")),
            storage_type: StorageType::Pantry,
            ..ProductDraft::default()
        };

        let product = draft.into_product(ProductId::new("7")).unwrap();
        assert_eq!(product.name, "Riso");
        assert_eq!(product.quantity, Decimal::from(500));
        assert_eq!(product.unit, Unit::G);
        assert_eq!(product.storage_type, StorageType::Pantry);
    }
}
