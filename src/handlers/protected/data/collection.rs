use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::database::{Collection, Document};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

use super::utils::{parse_collection, ListQuery};

/// GET /api/:collection - List documents in insertion order
pub async fn get(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let collection = parse_collection(&collection)?;
    list(&state, collection, &query).await
}

/// POST /api/:collection - Insert one document
pub async fn post(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let collection = parse_collection(&collection)?;
    let body = Document::body_from_json(payload)?;

    let document = state.store.insert(collection, body).await?;
    tracing::info!("{} inserted {} into {}", user.email, document.id, collection);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "insertedId": document.id.to_string(),
            "document": document.to_json(),
        })),
    ))
}

/// Shared by the protected list route and the public catalog routes
pub async fn list(
    state: &AppState,
    collection: Collection,
    query: &ListQuery,
) -> Result<Json<Value>, ApiError> {
    let page = query.page(state.config.api.max_page_size);
    let documents = state.store.find_all(collection, page).await?;
    Ok(Json(Document::to_json_array(documents)))
}
