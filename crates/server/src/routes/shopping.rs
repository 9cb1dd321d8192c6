//! Shopping list routes.

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

const SHOPPING: ListRoute = ListRoute {
    kind: ListKind::Shopping,
    collection: "items",
    record: "item",
    fetch_action: "fetch shopping list",
    add_action: "add shopping item",
    update_action: "update shopping item",
    delete_action: "delete shopping item",
};

/// List a user's shopping items.
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Value>> {
    records::list(&SHOPPING, &state, &username).await
}

/// Append a shopping item exactly as posted.
#[tracing::instrument(skip(state, item))]
pub async fn create(
    State(state): State<AppState>,
    Path(username): Path<String>,
    JsonBody(item): JsonBody<Value>,
) -> Result<Json<Value>> {
    records::create(&SHOPPING, &state, &username, item).await
}

/// Set the completed flag of a shopping item.
#[tracing::instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    Path((username, id)): Path<(String, String)>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<Value>> {
    records::update(&SHOPPING, &state, &username, &id, &body).await
}

/// Delete a shopping item.
#[tracing::instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path((username, id)): Path<(String, String)>,
) -> Result<Json<Value>> {
    records::remove(&SHOPPING, &state, &username, &id).await
}
