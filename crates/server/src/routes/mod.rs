//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Liveness, {"status":"ok"}
//! GET    /health/ready                    - Store reachability
//!
//! # Products (bearer token when configured)
//! GET    /products/{username}             - {"products": [...]}
//! POST   /products/{username}             - Append, {"success": true, "product": ...}
//! PUT    /products/{username}/{id}        - Set quantity, {"success": true}
//! DELETE /products/{username}/{id}        - Remove, {"success": true}
//!
//! # Shopping list (bearer token when configured)
//! GET    /shopping/{username}             - {"items": [...]}
//! POST   /shopping/{username}             - Append, {"success": true, "item": ...}
//! PUT    /shopping/{username}/{id}        - Set completed, {"success": true}
//! DELETE /shopping/{username}/{id}        - Remove, {"success": true}
//! ```
//!
//! Every route can be mounted under `DISPENSA_BASE_PATH`.

pub mod health;
pub mod products;
mod records;
pub mod shopping;

use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRequest},
    middleware::from_fn_with_state,
    routing::get,
};

use crate::error::AppError;
use crate::middleware::require_bearer_token;
use crate::state::AppState;

/// Largest request body on the data routes: a 5 MiB photo grows by a
/// third once base64 encoded, plus the rest of the product record.
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// JSON body extractor whose rejection is an `AppError::BadRequest`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Create the health check router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}

/// Create the products and shopping list router.
pub fn data_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/products/{username}",
            get(products::list).post(products::create),
        )
        .route(
            "/products/{username}/{id}",
            axum::routing::put(products::update).delete(products::remove),
        )
        .route(
            "/shopping/{username}",
            get(shopping::list).post(shopping::create),
        )
        .route(
            "/shopping/{username}/{id}",
            axum::routing::put(shopping::update).delete(shopping::remove),
        )
        .route_layer(from_fn_with_state(state.clone(), require_bearer_token))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}

/// Every route, unprefixed.
pub fn routes(state: &AppState) -> Router<AppState> {
    health_routes().merge(data_routes(state))
}
