use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub payments: PaymentsConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string. When absent the in-memory store is used.
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub max_page_size: i64,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// HS256 signing secret. Empty means tokens can be neither issued nor verified.
    #[serde(skip_serializing)]
    pub access_token_secret: String,
    pub access_token_ttl_secs: u64,
    /// `*` allows any origin.
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentsConfig {
    #[serde(skip_serializing)]
    pub stripe_secret_key: Option<String>,
    pub stripe_api_base: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// Upper bound for the token window; keeps `exp` arithmetic far away from overflow.
const MAX_TOKEN_TTL_SECS: u64 = 60 * 60 * 24 * 365;

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source (the process env in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(lookup)
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        // Server overrides
        if let Some(v) = lookup("CLASSMARKET_PORT").or_else(|| lookup("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = Some(v).filter(|s| !s.trim().is_empty());
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Some(v) = lookup("API_MAX_PAGE_SIZE") {
            self.api.max_page_size = v.parse().unwrap_or(self.api.max_page_size);
        }
        if let Some(v) = lookup("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Some(v) = lookup("ACCESS_TOKEN_SECRET") {
            self.security.access_token_secret = v;
        }
        if let Some(v) = lookup("ACCESS_TOKEN_TTL_SECS") {
            self.security.access_token_ttl_secs = v
                .parse::<u64>()
                .ok()
                .filter(|secs| (1..=MAX_TOKEN_TTL_SECS).contains(secs))
                .unwrap_or(self.security.access_token_ttl_secs);
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Payment overrides
        if let Some(v) = lookup("STRIPE_SECRET_KEY") {
            self.payments.stripe_secret_key = Some(v).filter(|s| !s.trim().is_empty());
        }
        if let Some(v) = lookup("STRIPE_API_BASE") {
            self.payments.stripe_api_base = v;
        }
        if let Some(v) = lookup("CHECKOUT_SUCCESS_URL") {
            self.payments.success_url = v;
        }
        if let Some(v) = lookup("CHECKOUT_CANCEL_URL") {
            self.payments.cancel_url = v;
        }

        self
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 5000 },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                max_page_size: 1000,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            security: SecurityConfig {
                access_token_secret: String::new(),
                access_token_ttl_secs: 300,
                cors_origins: vec!["*".to_string()],
            },
            payments: PaymentsConfig {
                stripe_secret_key: None,
                stripe_api_base: "https://api.stripe.com".to_string(),
                success_url: "http://localhost:5173/payment/success".to_string(),
                cancel_url: "http://localhost:5173/payment/cancel".to_string(),
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 5000 },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            api: ApiConfig {
                max_page_size: 500,
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
            },
            security: SecurityConfig {
                access_token_secret: String::new(),
                access_token_ttl_secs: 300,
                cors_origins: vec!["*".to_string()],
            },
            payments: PaymentsConfig {
                stripe_secret_key: None,
                stripe_api_base: "https://api.stripe.com".to_string(),
                success_url: "https://staging.example.com/payment/success".to_string(),
                cancel_url: "https://staging.example.com/payment/cancel".to_string(),
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 5000 },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            api: ApiConfig {
                max_page_size: 100,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            security: SecurityConfig {
                access_token_secret: String::new(),
                access_token_ttl_secs: 300,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
            payments: PaymentsConfig {
                stripe_secret_key: None,
                stripe_api_base: "https://api.stripe.com".to_string(),
                success_url: "https://app.example.com/payment/success".to_string(),
                cancel_url: "https://app.example.com/payment/cancel".to_string(),
            },
        }
    }
}
