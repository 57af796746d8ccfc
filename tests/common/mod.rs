#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;

use classmarket_api::database::MemoryDocumentStore;
use classmarket_api::payments::{CheckoutSession, PaymentError, PaymentProvider};
use classmarket_api::{routes, AppConfig, AppState};

pub const TEST_SECRET: &str = "integration-test-secret";

pub struct TestServer {
    pub base_url: String,
    pub state: AppState,
    pub payments: Arc<FakePayments>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Mint a token with the server's own authority
    pub fn token_for(&self, email: &str) -> String {
        self.state.tokens.issue(email).expect("issue test token")
    }

    pub fn bearer(&self, email: &str) -> String {
        format!("Bearer {}", self.token_for(email))
    }
}

/// Records requested prices and hands back predictable sessions
#[derive(Default)]
pub struct FakePayments {
    pub requested: Mutex<Vec<String>>,
}

#[async_trait]
impl PaymentProvider for FakePayments {
    async fn create_checkout_session(&self, price_id: &str) -> Result<CheckoutSession, PaymentError> {
        if price_id.trim().is_empty() {
            return Err(PaymentError::InvalidPrice("priceId must not be empty".to_string()));
        }
        let mut requested = self.requested.lock().await;
        requested.push(price_id.to_string());
        Ok(CheckoutSession {
            id: format!("cs_test_{}", requested.len()),
            url: format!("https://checkout.example.com/pay/{}", price_id),
        })
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.access_token_secret = TEST_SECRET.to_string();
    config
}

pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with(test_config()).await
}

/// Serve the real router on an ephemeral port, backed by the memory store.
/// Each test gets its own server since every #[tokio::test] owns its runtime.
pub async fn spawn_server_with(config: AppConfig) -> Result<TestServer> {
    let payments = Arc::new(FakePayments::default());
    let state = AppState::new(config, Arc::new(MemoryDocumentStore::new()), payments.clone());
    let base_url = serve(state.clone()).await?;

    Ok(TestServer {
        base_url,
        state,
        payments,
    })
}

/// Serve the router for `state` in the background and return its base URL
pub async fn serve(state: AppState) -> Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind test listener")?;
    let addr = listener.local_addr()?;

    let app = routes::app(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(format!("http://{}", addr))
}
