//! The `Auth` component
//!
//! Single entry point for every identity operation: password hashing and
//! verification plus token issuance and parsing. Holds nothing but the
//! keys derived from the configured secret, so it is cheap to clone and
//! safe to share across requests.

use super::{AuthError, HashedPassword, JwtService, PasswordService, Token};
use uuid::Uuid;

#[derive(Clone)]
pub struct Auth {
    jwt: JwtService,
}

impl Auth {
    pub fn new(secret: &str, token_ttl_secs: i64) -> Self {
        Self {
            jwt: JwtService::new(secret, token_ttl_secs),
        }
    }

    /// Salted one-way hash of `plaintext`
    pub fn encrypt_password(&self, plaintext: &str) -> Result<HashedPassword, AuthError> {
        PasswordService::hash(plaintext)
    }

    /// `Ok(true)` iff `plaintext` matches `hashed`
    pub fn verify_password(&self, plaintext: &str, hashed: &HashedPassword) -> Result<bool, AuthError> {
        PasswordService::verify(plaintext, hashed)
    }

    pub async fn encrypt_password_async(&self, plaintext: String) -> Result<HashedPassword, AuthError> {
        PasswordService::hash_async(plaintext).await
    }

    pub async fn verify_password_async(
        &self,
        plaintext: String,
        hashed: HashedPassword,
    ) -> Result<bool, AuthError> {
        PasswordService::verify_async(plaintext, hashed).await
    }

    /// Check a login attempt. `stored` is `None` when no user matched; that
    /// path still performs one hash verification and yields `Ok(false)`.
    pub async fn verify_login_async(
        &self,
        plaintext: String,
        stored: Option<HashedPassword>,
    ) -> Result<bool, AuthError> {
        PasswordService::verify_or_dummy_async(plaintext, stored).await
    }

    pub fn create_token(&self, subject: Uuid) -> Result<String, AuthError> {
        self.jwt.create_token(subject)
    }

    pub fn create_token_with_ttl(&self, subject: Uuid, ttl_secs: i64) -> Result<String, AuthError> {
        self.jwt.create_token_with_ttl(subject, ttl_secs)
    }

    pub fn parse(&self, token: &str) -> Result<Token, AuthError> {
        self.jwt.parse(token)
    }

    pub fn token_ttl_secs(&self) -> i64 {
        self.jwt.token_ttl_secs()
    }
}
