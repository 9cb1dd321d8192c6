//! Product inventory routes.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::Value;

use super::JsonBody;
use super::records::{self, ListRoute};
use crate::error::Result;
use crate::repository::ListKind;
use crate::state::AppState;

const PRODUCTS: ListRoute = ListRoute {
    kind: ListKind::Products,
    collection: "products",
    record: "product",
    fetch_action: "fetch products",
    add_action: "add product",
    update_action: "update product",
    delete_action: "delete product",
};

/// List a user's products.
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Value>> {
    records::list(&PRODUCTS, &state, &username).await
}

/// Append a product exactly as posted.
#[tracing::instrument(skip(state, product))]
pub async fn create(
    State(state): State<AppState>,
    Path(username): Path<String>,
    JsonBody(product): JsonBody<Value>,
) -> Result<Json<Value>> {
    records::create(&PRODUCTS, &state, &username, product).await
}

/// Overwrite the quantity of a product.
#[tracing::instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    Path((username, id)): Path<(String, String)>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<Value>> {
    records::update(&PRODUCTS, &state, &username, &id, &body).await
}

/// Delete a product.
#[tracing::instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path((username, id)): Path<(String, String)>,
) -> Result<Json<Value>> {
    records::remove(&PRODUCTS, &state, &username, &id).await
}
