//! Handler bodies shared by the products and shopping routes.

use axum::Json;
use serde_json::{Value, json};

use crate::error::{AppError, Result};
use crate::repository::{ListKind, RecordList};
use crate::state::AppState;

/// Naming for one list's responses and errors.
pub struct ListRoute {
    pub kind: ListKind,
    /// Key of the array in GET responses.
    pub collection: &'static str,
    /// Key of the echoed record in POST responses.
    pub record: &'static str,
    pub fetch_action: &'static str,
    pub add_action: &'static str,
    pub update_action: &'static str,
    pub delete_action: &'static str,
}

pub async fn list(route: &ListRoute, state: &AppState, username: &str) -> Result<Json<Value>> {
    let records = RecordList::new(state.store(), route.kind, username)
        .list()
        .await
        .map_err(|e| AppError::store(route.fetch_action, e))?;

    Ok(Json(json!({ route.collection: records })))
}

pub async fn create(
    route: &ListRoute,
    state: &AppState,
    username: &str,
    record: Value,
) -> Result<Json<Value>> {
    RecordList::new(state.store(), route.kind, username)
        .append(record.clone())
        .await
        .map_err(|e| AppError::store(route.add_action, e))?;

    tracing::debug!(list = route.kind.prefix(), %username, "Record added");
    Ok(Json(json!({ "success": true, route.record: record })))
}

pub async fn update(
    route: &ListRoute,
    state: &AppState,
    username: &str,
    id: &str,
    body: &Value,
) -> Result<Json<Value>> {
    let field = route.kind.patch_field();
    let value = body
        .as_object()
        .and_then(|fields| fields.get(field))
        .ok_or_else(|| AppError::BadRequest(format!("body must be an object with `{field}`")))?;

    let changed = RecordList::new(state.store(), route.kind, username)
        .patch(id, field, value)
        .await
        .map_err(|e| AppError::store(route.update_action, e))?;

    if changed == 0 {
        tracing::debug!(list = route.kind.prefix(), %username, %id, "Update matched no record");
    }
    Ok(Json(json!({ "success": true })))
}

pub async fn remove(
    route: &ListRoute,
    state: &AppState,
    username: &str,
    id: &str,
) -> Result<Json<Value>> {
    let removed = RecordList::new(state.store(), route.kind, username)
        .remove(id)
        .await
        .map_err(|e| AppError::store(route.delete_action, e))?;

    if removed == 0 {
        tracing::debug!(list = route.kind.prefix(), %username, %id, "Delete matched no record");
    }
    Ok(Json(json!({ "success": true })))
}
