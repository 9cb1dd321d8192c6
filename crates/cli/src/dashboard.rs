//! Client-side inventory state.
//!
//! [`Dashboard`] mirrors the user's products and shopping list. Every
//! mutation goes to the backend first; local state changes only after the
//! call succeeds.

use chrono::{DateTime, NaiveDate, Utc};
use dispensa_core::expiry::sort_by_expiry;
use dispensa_core::recipe::Recipe;
use dispensa_core::{
    Product, ProductDraft, ProductDraftError, ProductId, ShoppingItem, ShoppingItemId,
    StorageFilter, StorageType, Username,
};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::api::{ApiError, InventoryApi};
use crate::recipe::RecipeClient;

/// Shown when the product list cannot be loaded.
pub const LOAD_PRODUCTS_ERROR: &str = "Errore nel caricamento dei prodotti. Riprova.";

/// Errors from dashboard actions.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Draft(#[from] ProductDraftError),

    #[error("no product with id {0}")]
    UnknownProduct(ProductId),

    #[error("no shopping item with id {0}")]
    UnknownShoppingItem(ShoppingItemId),

    #[error("shopping item name is required")]
    BlankShoppingName,

    #[error("quantity cannot be negative")]
    NegativeQuantity,

    #[error("select at least one product")]
    EmptySelection,
}

/// Products per storage location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageCounts {
    pub fridge: usize,
    pub pantry: usize,
}

/// The logged-in user's inventory as the client sees it.
pub struct Dashboard<A> {
    api: A,
    user: Username,
    products: Vec<Product>,
    shopping: Vec<ShoppingItem>,
    filter: StorageFilter,
    error: Option<String>,
}

impl<A: InventoryApi> Dashboard<A> {
    #[must_use]
    pub const fn new(api: A, user: Username) -> Self {
        Self {
            api,
            user,
            products: Vec::new(),
            shopping: Vec::new(),
            filter: StorageFilter::All,
            error: None,
        }
    }

    #[must_use]
    pub const fn user(&self) -> &Username {
        &self.user
    }

    /// Products in backend order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn shopping_items(&self) -> &[ShoppingItem] {
        &self.shopping
    }

    /// The message from the last failed product load, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn filter(&self) -> StorageFilter {
        self.filter
    }

    pub const fn set_filter(&mut self, filter: StorageFilter) {
        self.filter = filter;
    }

    /// Replace the product list from the backend.
    ///
    /// On failure the previous list is kept and [`Dashboard::error`] is set.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Api` if the fetch fails.
    pub async fn load_products(&mut self) -> Result<(), DashboardError> {
        self.error = None;
        match self.api.list_products(&self.user).await {
            Ok(products) => {
                self.products = products;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load products");
                self.error = Some(LOAD_PRODUCTS_ERROR.to_string());
                Err(e.into())
            }
        }
    }

    /// Replace the shopping list from the backend, keeping it on failure.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Api` if the fetch fails.
    pub async fn load_shopping_list(&mut self) -> Result<(), DashboardError> {
        match self.api.list_shopping(&self.user).await {
            Ok(items) => {
                self.shopping = items;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load shopping list");
                Err(e.into())
            }
        }
    }

    /// Submit the add-product form.
    ///
    /// The id is the submission time in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Draft` for an incomplete form, or
    /// `DashboardError::Api` if the backend rejects it.
    pub async fn add_product(
        &mut self,
        draft: ProductDraft,
        now: DateTime<Utc>,
    ) -> Result<Product, DashboardError> {
        let product = draft.into_product(ProductId::from_timestamp(now))?;
        self.api.add_product(&self.user, &product).await?;
        tracing::info!(id = %product.id, name = %product.name, "Product added");
        self.products.push(product.clone());
        Ok(product)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Api` if the backend call fails.
    pub async fn delete_product(&mut self, id: &ProductId) -> Result<(), DashboardError> {
        self.api.delete_product(&self.user, id).await?;
        self.products.retain(|p| &p.id != id);
        Ok(())
    }

    /// Set a product's quantity.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::NegativeQuantity` for a negative value, or
    /// `DashboardError::Api` if the backend call fails.
    pub async fn update_quantity(
        &mut self,
        id: &ProductId,
        quantity: Decimal,
    ) -> Result<(), DashboardError> {
        if quantity < Decimal::ZERO {
            return Err(DashboardError::NegativeQuantity);
        }
        self.api.update_quantity(&self.user, id, quantity).await?;
        for product in self.products.iter_mut().filter(|p| &p.id == id) {
            product.quantity = quantity;
        }
        Ok(())
    }

    /// Add one unit. Returns the new quantity.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::UnknownProduct` if the product is not loaded.
    pub async fn increment(&mut self, id: &ProductId) -> Result<Decimal, DashboardError> {
        let quantity = self.find_product(id)?.incremented_quantity();
        self.update_quantity(id, quantity).await?;
        Ok(quantity)
    }

    /// Remove one unit, stopping at zero. Returns the new quantity.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::UnknownProduct` if the product is not loaded.
    pub async fn decrement(&mut self, id: &ProductId) -> Result<Decimal, DashboardError> {
        let quantity = self.find_product(id)?.decremented_quantity();
        self.update_quantity(id, quantity).await?;
        Ok(quantity)
    }

    /// Products passing the storage filter, soonest expiry first.
    #[must_use]
    pub fn visible_products(&self, today: NaiveDate) -> Vec<Product> {
        let mut visible: Vec<Product> = self
            .products
            .iter()
            .filter(|p| self.filter.matches(p.storage_type))
            .cloned()
            .collect();
        sort_by_expiry(&mut visible, today);
        visible
    }

    #[must_use]
    pub fn counts(&self) -> StorageCounts {
        self.products
            .iter()
            .fold(StorageCounts::default(), |mut counts, p| {
                match p.storage_type {
                    StorageType::Fridge => counts.fridge += 1,
                    StorageType::Pantry => counts.pantry += 1,
                }
                counts
            })
    }

    /// Add a shopping list entry.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::BlankShoppingName` for a blank name, or
    /// `DashboardError::Api` if the backend call fails.
    pub async fn add_shopping_item(
        &mut self,
        name: &str,
        quantity: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<ShoppingItem, DashboardError> {
        let item =
            ShoppingItem::new(name, quantity, now).ok_or(DashboardError::BlankShoppingName)?;
        self.api.add_shopping_item(&self.user, &item).await?;
        self.shopping.push(item.clone());
        Ok(item)
    }

    /// Mark a shopping item as bought or not.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Api` if the backend call fails.
    pub async fn set_shopping_completed(
        &mut self,
        id: &ShoppingItemId,
        completed: bool,
    ) -> Result<(), DashboardError> {
        self.api
            .set_shopping_completed(&self.user, id, completed)
            .await?;
        for item in self.shopping.iter_mut().filter(|i| &i.id == id) {
            item.completed = completed;
        }
        Ok(())
    }

    /// Flip a shopping item's completed flag. Returns the new value.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::UnknownShoppingItem` if the item is not loaded.
    pub async fn toggle_shopping_item(&mut self, id: &ShoppingItemId) -> Result<bool, DashboardError> {
        let completed = !self
            .shopping
            .iter()
            .find(|i| &i.id == id)
            .ok_or_else(|| DashboardError::UnknownShoppingItem(id.clone()))?
            .completed;
        self.set_shopping_completed(id, completed).await?;
        Ok(completed)
    }

    /// Delete a shopping item.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Api` if the backend call fails.
    pub async fn delete_shopping_item(&mut self, id: &ShoppingItemId) -> Result<(), DashboardError> {
        self.api.delete_shopping_item(&self.user, id).await?;
        self.shopping.retain(|i| &i.id != id);
        Ok(())
    }

    /// Items still to buy, in insertion order.
    pub fn active_items(&self) -> impl Iterator<Item = &ShoppingItem> {
        self.shopping.iter().filter(|i| !i.completed)
    }

    /// Items already bought, in insertion order.
    pub fn completed_items(&self) -> impl Iterator<Item = &ShoppingItem> {
        self.shopping.iter().filter(|i| i.completed)
    }

    /// Names of the selected products, in inventory order.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::EmptySelection` for no ids, or
    /// `DashboardError::UnknownProduct` for an id that is not loaded.
    pub fn selected_ingredients(&self, ids: &[ProductId]) -> Result<Vec<String>, DashboardError> {
        if ids.is_empty() {
            return Err(DashboardError::EmptySelection);
        }
        if let Some(missing) = ids.iter().find(|id| !self.products.iter().any(|p| &&p.id == id)) {
            return Err(DashboardError::UnknownProduct(missing.clone()));
        }
        Ok(self
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .map(|p| p.name.clone())
            .collect())
    }

    /// Ask the recipe service for a recipe using the selected products.
    ///
    /// # Errors
    ///
    /// Returns an error only for a bad selection; generation failures become
    /// a fallback recipe.
    pub async fn suggest_recipe(
        &self,
        recipes: &RecipeClient,
        ids: &[ProductId],
    ) -> Result<Recipe, DashboardError> {
        let ingredients = self.selected_ingredients(ids)?;
        Ok(recipes.suggest(&ingredients).await)
    }

    fn find_product(&self, id: &ProductId) -> Result<&Product, DashboardError> {
        self.products
            .iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| DashboardError::UnknownProduct(id.clone()))
    }
}
