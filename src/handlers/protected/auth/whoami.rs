// handlers/protected/auth/whoami.rs - GET /me handler

use axum::{
    extract::{Extension, State},
    Json,
};
use serde_json::Value;

use crate::database::Collection;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// GET /me - The users document whose `email` matches the token subject
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let document = state
        .store
        .find_one_by(Collection::Users, "email", &Value::String(user.email.clone()))
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No user record for {}", user.email)))?;

    Ok(Json(document.to_json()))
}
