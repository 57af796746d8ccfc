pub mod stripe;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use stripe::StripeProvider;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Payment provider is not configured")]
    NotConfigured,

    #[error("Invalid price id: {0}")]
    InvalidPrice(String),

    #[error("Payment provider error: {0}")]
    Provider(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// A hosted checkout page the client is redirected to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a one-item checkout session for `price_id`
    async fn create_checkout_session(&self, price_id: &str) -> Result<CheckoutSession, PaymentError>;
}
