//! Core types for Dispensa.
//!
//! This module provides type-safe wrappers for the inventory domain.

pub mod id;
pub mod product;
pub mod shopping;
pub mod storage;
pub mod unit;
pub mod username;

pub use id::*;
pub use product::{CATEGORIES, Product, ProductDraft, ProductDraftError};
pub use shopping::ShoppingItem;
pub use storage::{StorageFilter, StorageType};
pub use unit::Unit;
pub use username::{Username, UsernameError};
