// handlers/public/auth/token.rs - POST /jwt handler

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub auth: bool,
    pub access_token: String,
}

/// POST /jwt - Issue an access token for the given email
///
/// Input: `{"email": "a@example.com"}`
/// Output: `{"auth": true, "accessToken": "eyJhbGciOiJIUzI1NiI..."}`
///
/// The email is not checked against the users collection.
pub async fn issue(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let access_token = state.tokens.issue(&payload.email)?;

    tracing::debug!("Issued access token for {}", payload.email);

    Ok(Json(TokenResponse {
        auth: true,
        access_token,
    }))
}
