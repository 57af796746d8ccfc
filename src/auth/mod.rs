use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;

/// Claims carried by every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject identifier (the user's email address)
    pub email: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
    /// Unique token id, so two tokens for one subject never collide
    pub jti: Uuid,
}

/// Why a request's credential was refused. Answered by the auth middleware
/// with its fixed 401/403 bodies.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No Authorization header, or no token segment in it
    #[error("missing credential")]
    MissingCredential,

    /// Bad signature, expired, malformed, or no secret to verify with
    #[error("invalid credential")]
    InvalidCredential,
}

/// Why a token could not be minted
#[derive(Debug, Error)]
pub enum IssueError {
    #[error("token signing failed: {0}")]
    SigningFailure(String),

    #[error("token subject must not be empty")]
    EmptySubject,
}

/// Source of the current instant for `issue` and `verify`
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

// Largest window chrono can represent as a Duration
const MAX_TTL_SECS: u64 = i64::MAX as u64 / 1000;

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Issues and verifies access tokens under one process-wide HS256 secret.
///
/// Built once from [`SecurityConfig`] and shared read-only between requests.
pub struct TokenAuthority {
    keys: Option<SigningKeys>,
    ttl: Duration,
    clock: Clock,
}

impl TokenAuthority {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        let keys = (!secret.is_empty()).then(|| SigningKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        });

        Self {
            keys,
            ttl: Duration::seconds(ttl_secs.min(MAX_TTL_SECS) as i64),
            clock: Arc::new(Utc::now),
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(&security.access_token_secret, security.access_token_ttl_secs)
    }

    /// Replace the wall clock used by `issue` and `verify`
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn has_secret(&self) -> bool {
        self.keys.is_some()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, subject: &str) -> Result<String, IssueError> {
        self.issue_at(subject, (self.clock)())
    }

    /// Mint a token for `subject` as if the current time were `now`.
    /// The subject is taken verbatim; only an empty string is refused.
    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<String, IssueError> {
        if subject.is_empty() {
            return Err(IssueError::EmptySubject);
        }

        let keys = self
            .keys
            .as_ref()
            .ok_or_else(|| IssueError::SigningFailure("signing secret is not configured".to_string()))?;

        let expires = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| IssueError::SigningFailure("token expiry out of range".to_string()))?;

        let claims = Claims {
            email: subject.to_string(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
            jti: Uuid::new_v4(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|e| IssueError::SigningFailure(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, (self.clock)())
    }

    /// Verify signature and expiry against `now`. Expired and tampered tokens
    /// both come back as `InvalidCredential`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let keys = self.keys.as_ref().ok_or(AuthError::InvalidCredential)?;

        // Expiry is checked below against the caller's clock with zero leeway
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &keys.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token rejected: {}", e);
                AuthError::InvalidCredential
            })?;

        if now.timestamp() >= claims.exp {
            tracing::debug!("Token rejected: expired at {}", claims.exp);
            return Err(AuthError::InvalidCredential);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("has_secret", &self.has_secret())
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish()
    }
}
