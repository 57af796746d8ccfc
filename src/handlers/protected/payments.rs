// handlers/protected/payments.rs - POST /create-checkout-session handler

use axum::{
    extract::{Extension, State},
    Json,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::payments::CheckoutSession;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub price_id: String,
}

/// POST /create-checkout-session - Start a hosted checkout for one price
///
/// Input: `{"priceId": "price_..."}`
/// Output: `{"id": "cs_...", "url": "https://checkout.stripe.com/..."}`
pub async fn create_checkout_session(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CheckoutRequest>,
) -> Result<Json<CheckoutSession>, ApiError> {
    let session = state
        .payments
        .create_checkout_session(&payload.price_id)
        .await?;

    tracing::info!("{} opened checkout session {}", user.email, session.id);
    Ok(Json(session))
}
