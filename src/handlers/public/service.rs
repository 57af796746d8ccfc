use axum::{extract::State, http::StatusCode};
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET / - Service banner
pub async fn root() -> ApiResult<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Ok(ApiResponse::success(json!({
        "name": "Classmarket API",
        "version": version,
        "description": "Class marketplace backend built with Rust (Axum)",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "token": "POST /jwt (public - token acquisition)",
            "catalog": "/categories, /classes, /events [/:id] (public)",
            "data": "/api/:collection[/:id] (protected)",
            "profile": "/me (protected)",
            "checkout": "POST /create-checkout-session (protected)"
        }
    })))
}

/// GET /health - Liveness plus document store connectivity
pub async fn health(State(state): State<AppState>) -> ApiResponse<Value> {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => ApiResponse::success(json!({
            "status": "ok",
            "timestamp": now,
            "database": "ok"
        })),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            ApiResponse::with_status(
                json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                }),
                StatusCode::SERVICE_UNAVAILABLE,
            )
        }
    }
}
