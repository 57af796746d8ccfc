use std::sync::Arc;

use crate::auth::TokenAuthority;
use crate::config::AppConfig;
use crate::database::{DatabaseManager, DocumentStore, MemoryDocumentStore, PgDocumentStore};
use crate::payments::{PaymentProvider, StripeProvider};

/// Everything a request handler needs, built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenAuthority>,
    pub store: Arc<dyn DocumentStore>,
    pub payments: Arc<dyn PaymentProvider>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn DocumentStore>,
        payments: Arc<dyn PaymentProvider>,
    ) -> Self {
        let tokens = Arc::new(TokenAuthority::from_config(&config.security));
        Self {
            config: Arc::new(config),
            tokens,
            store,
            payments,
        }
    }

    /// Swap in a differently built token authority (e.g. one with its own clock)
    pub fn with_tokens(mut self, tokens: TokenAuthority) -> Self {
        self.tokens = Arc::new(tokens);
        self
    }

    /// Connect the configured collaborators: Postgres when `DATABASE_URL` is
    /// set (memory otherwise) and Stripe for payments.
    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn DocumentStore> = match config.database.url {
            Some(_) => {
                let pool = DatabaseManager::connect(&config.database).await?;
                Arc::new(PgDocumentStore::new(pool))
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using in-memory document store");
                Arc::new(MemoryDocumentStore::new())
            }
        };

        let stripe = StripeProvider::from_config(&config.payments)?;
        if !stripe.is_configured() {
            tracing::warn!("STRIPE_SECRET_KEY not set; checkout sessions will be unavailable");
        }

        let state = Self::new(config, store, Arc::new(stripe));
        if !state.tokens.has_secret() {
            tracing::warn!("ACCESS_TOKEN_SECRET not set; token issuance and protected routes will fail");
        }

        Ok(state)
    }
}
