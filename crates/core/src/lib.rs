//! Dispensa Core - Shared types library.
//!
//! This crate provides the data model shared by every Dispensa component:
//! - `server` - Key-value CRUD backend for products and shopping lists
//! - `cli` - Terminal client (dashboard, shopping list, recipe suggestions)
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. Anything that needs "today" or "now"
//! takes it as an argument so callers decide which clock to use.
//!
//! # Modules
//!
//! - [`types`] - Products, shopping items, usernames and their enums
//! - [`expiry`] - Days-until-expiry, urgency bands and the expiry sort
//! - [`date_entry`] - Manual `dd/mm/yyyy` date entry
//! - [`recipe`] - Recipe payload and extraction from free-text model output

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod date_entry;
pub mod expiry;
pub mod recipe;
pub mod types;

pub use types::*;
