//! Dispensa terminal client library.
//!
//! Everything the `dispensa` binary does, minus argument parsing and
//! printing, so the integration tests can drive it against a real server.
//!
//! # Modules
//!
//! - [`api`] - Backend HTTP client behind the [`api::InventoryApi`] trait
//! - [`dashboard`] - Local inventory and shopping list state
//! - [`barcode`] - Open Food Facts lookup
//! - [`capture`] - Photo upload and the other capture backends
//! - [`recipe`] - Gemini recipe suggestions with retry and fallback
//! - [`session`] - Logged-in user persistence
//! - [`config`] - Environment configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod barcode;
pub mod capture;
pub mod config;
pub mod dashboard;
pub mod recipe;
pub mod session;
