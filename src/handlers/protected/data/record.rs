use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::database::{Collection, Document};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

use super::utils::{not_found, parse_collection, parse_id};

/// GET /api/:collection/:id - Get a single document by id
pub async fn get(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let collection = parse_collection(&collection)?;
    find(&state, collection, &id).await
}

/// PATCH /api/:collection/:id - Set the given top-level fields on a document
pub async fn patch(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let collection = parse_collection(&collection)?;
    let doc_id = parse_id(collection, &id)?;
    let changes = Document::body_from_json(payload)?;

    let document = state
        .store
        .update(collection, doc_id, changes)
        .await?
        .ok_or_else(|| not_found(collection, &id))?;

    tracing::info!("{} updated {} in {}", user.email, doc_id, collection);
    Ok(Json(document.to_json()))
}

/// DELETE /api/:collection/:id - Remove a document
pub async fn delete(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let collection = parse_collection(&collection)?;
    let doc_id = parse_id(collection, &id)?;

    if !state.store.delete(collection, doc_id).await? {
        return Err(not_found(collection, &id));
    }

    tracing::info!("{} deleted {} from {}", user.email, doc_id, collection);
    Ok(Json(json!({ "deletedCount": 1 })))
}

/// Shared by the protected record route and the public catalog routes
pub async fn find(state: &AppState, collection: Collection, id: &str) -> Result<Json<Value>, ApiError> {
    let doc_id = parse_id(collection, id)?;
    let document = state
        .store
        .find_by_id(collection, doc_id)
        .await?
        .ok_or_else(|| not_found(collection, id))?;

    Ok(Json(document.to_json()))
}
