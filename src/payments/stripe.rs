use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use super::{CheckoutSession, PaymentError, PaymentProvider};
use crate::config::PaymentsConfig;

/// Checkout sessions through the Stripe REST API.
#[derive(Debug, Clone)]
pub struct StripeProvider {
    client: reqwest::Client,
    api_base: Url,
    secret_key: Option<String>,
    success_url: String,
    cancel_url: String,
}

#[derive(Debug, Deserialize)]
struct StripeSession {
    id: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

impl StripeProvider {
    pub fn from_config(config: &PaymentsConfig) -> anyhow::Result<Self> {
        let api_base = Url::parse(&config.stripe_api_base)?;
        // Validate redirect targets up front rather than on the first checkout
        Url::parse(&config.success_url)?;
        Url::parse(&config.cancel_url)?;

        Ok(Self {
            client: reqwest::Client::new(),
            api_base,
            secret_key: config.stripe_secret_key.clone(),
            success_url: config.success_url.clone(),
            cancel_url: config.cancel_url.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.secret_key.is_some()
    }

    fn sessions_url(&self) -> Result<Url, PaymentError> {
        self.api_base
            .join("v1/checkout/sessions")
            .map_err(|e| PaymentError::Provider(format!("invalid Stripe API base: {}", e)))
    }
}

#[async_trait]
impl PaymentProvider for StripeProvider {
    async fn create_checkout_session(&self, price_id: &str) -> Result<CheckoutSession, PaymentError> {
        let price_id = price_id.trim();
        if price_id.is_empty() {
            return Err(PaymentError::InvalidPrice("priceId must not be empty".to_string()));
        }

        let secret_key = self.secret_key.as_deref().ok_or(PaymentError::NotConfigured)?;

        let form = [
            ("mode", "payment"),
            ("line_items[0][price]", price_id),
            ("line_items[0][quantity]", "1"),
            ("success_url", self.success_url.as_str()),
            ("cancel_url", self.cancel_url.as_str()),
        ];

        let response = self
            .client
            .post(self.sessions_url()?)
            .bearer_auth(secret_key)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<StripeErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error.message)
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(PaymentError::Provider(message));
        }

        let session: StripeSession = response.json().await?;
        let url = session
            .url
            .ok_or_else(|| PaymentError::Provider(format!("session {} has no checkout url", session.id)))?;

        tracing::info!("Created checkout session {} for price {}", session.id, price_id);
        Ok(CheckoutSession { id: session.id, url })
    }
}
