use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::auth::{AuthError, Claims};
use crate::state::AppState;

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized Access";
pub const FORBIDDEN_MESSAGE: &str = "Access Forbidden!";

/// Authenticated subject extracted from the access token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self { email: claims.email }
    }
}

/// JWT authentication middleware that validates tokens and extracts user context
///
/// A missing credential is answered with 401, a bad or expired one with 403.
/// Either way the wrapped handler never runs.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let Some(token) = extract_bearer_token(request.headers()).map(str::to_owned) else {
        return Err(rejection(&request, AuthError::MissingCredential));
    };

    let claims = match state.tokens.verify(&token) {
        Ok(claims) => claims,
        Err(e) => return Err(rejection(&request, e)),
    };

    // Convert claims to AuthUser and inject into request
    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

/// Second whitespace-separated segment of the Authorization header.
/// The scheme word itself is not checked.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .split_whitespace()
        .nth(1)
}

/// The two client-facing rejection bodies. The token itself is never logged.
fn rejection(request: &Request, err: AuthError) -> Response {
    tracing::debug!("Rejected {} {}: {}", request.method(), request.uri().path(), err);

    let (status, message) = match err {
        AuthError::MissingCredential => (StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE),
        AuthError::InvalidCredential => (StatusCode::FORBIDDEN, FORBIDDEN_MESSAGE),
    };

    (status, Json(json!({ "auth": false, "message": message }))).into_response()
}
