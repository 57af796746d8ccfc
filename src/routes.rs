use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security.cors_origins);
    let body_limit = DefaultBodyLimit::max(state.config.api.max_request_size_bytes);

    Router::new()
        // Public
        .merge(public_routes())
        // Protected (JWT required)
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    use public::{auth, service};

    Router::new()
        .route("/", get(service::root))
        .route("/health", get(service::health))
        .route("/jwt", post(auth::token_issue))
        .merge(public::catalog::routes())
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{auth, data, payments};

    Router::new()
        .route("/me", get(auth::whoami_get))
        .route(
            "/create-checkout-session",
            post(payments::create_checkout_session),
        )
        // Collection-level operations
        .route(
            "/api/:collection",
            get(data::collection_get).post(data::collection_post),
        )
        // Document-level operations
        .route(
            "/api/:collection/:id",
            get(data::record_get)
                .patch(data::record_patch)
                .delete(data::record_delete),
        )
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
