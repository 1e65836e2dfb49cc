//! JWT token generation and validation
//!
//! Tokens are HS256-signed and carry the user id as `sub` plus `iat`/`exp`.
//! Keys are derived once from the configured secret and shared via `Arc`.

use super::AuthError;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Decoded, verified token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub subject: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TryFrom<Claims> for Token {
    type Error = AuthError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let subject = Uuid::parse_str(&claims.sub)
            .map_err(|_| AuthError::InvalidToken("subject is not a user id".to_string()))?;
        let issued_at = DateTime::from_timestamp(claims.iat, 0)
            .ok_or_else(|| AuthError::InvalidToken("iat out of range".to_string()))?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| AuthError::InvalidToken("exp out of range".to_string()))?;

        Ok(Token {
            subject,
            issued_at,
            expires_at,
        })
    }
}

/// Pre-computed JWT keys, created once at startup
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

/// JWT service for token operations
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    validation: Validation,
    token_ttl_secs: i64,
}

impl JwtService {
    /// Create a new JWT service with pre-computed keys
    ///
    /// Call once at startup and store in `AppState`.
    pub fn new(secret: &str, token_ttl_secs: i64) -> Self {
        Self::from_keys(JwtKeys::new(secret), token_ttl_secs)
    }

    pub fn from_keys(keys: JwtKeys, token_ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // exp is checked to the second, no grace period
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            keys,
            validation,
            token_ttl_secs,
        }
    }

    /// Issue a token for `subject` with the configured lifetime
    #[inline]
    pub fn create_token(&self, subject: Uuid) -> Result<String, AuthError> {
        self.create_token_with_ttl(subject, self.token_ttl_secs)
    }

    /// Issue a token for `subject` that expires `ttl_secs` from now
    pub fn create_token_with_ttl(&self, subject: Uuid, ttl_secs: i64) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = Duration::try_seconds(ttl_secs)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| AuthError::CryptoFailure(format!("Token TTL out of range: {}s", ttl_secs)))?;

        let claims = Claims {
            sub: subject.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, self.keys.encoding())
            .map_err(|e| AuthError::CryptoFailure(format!("Failed to sign token: {}", e)))
    }

    /// Verify signature and expiry, then decode the token
    pub fn parse(&self, token: &str) -> Result<Token, AuthError> {
        let data = decode::<Claims>(token, self.keys.decoding(), &self.validation).map_err(|e| {
            debug!(reason = %e, "Token rejected");
            AuthError::InvalidToken(e.to_string())
        })?;

        Token::try_from(data.claims)
    }

    #[inline]
    pub fn token_ttl_secs(&self) -> i64 {
        self.token_ttl_secs
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }
}
