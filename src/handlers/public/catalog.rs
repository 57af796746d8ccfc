// handlers/public/catalog.rs - Read-only catalog routes
//
// Categories, classes and events can be browsed without a token; every
// write goes through the protected /api/:collection routes.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde_json::Value;

use crate::database::Collection;
use crate::error::ApiError;
use crate::handlers::protected::data::{collection, record, utils::ListQuery};
use crate::state::AppState;

pub const CATALOG: [Collection; 3] = [Collection::Categories, Collection::Classes, Collection::Events];

pub fn routes() -> Router<AppState> {
    CATALOG.into_iter().fold(Router::new(), |router, catalog| {
        router
            .route(
                &format!("/{}", catalog),
                get(move |State(state): State<AppState>, Query(query): Query<ListQuery>| async move {
                    list(state, catalog, query).await
                }),
            )
            .route(
                &format!("/{}/:id", catalog),
                get(move |State(state): State<AppState>, Path(id): Path<String>| async move {
                    show(state, catalog, id).await
                }),
            )
    })
}

async fn list(state: AppState, catalog: Collection, query: ListQuery) -> Result<Json<Value>, ApiError> {
    collection::list(&state, catalog, &query).await
}

async fn show(state: AppState, catalog: Collection, id: String) -> Result<Json<Value>, ApiError> {
    record::find(&state, catalog, &id).await
}
