//! Password hashing using argon2
//!
//! # Performance Considerations
//!
//! Argon2 is intentionally CPU-intensive. Async callers should use the
//! `_async` variants, which run on tokio's blocking pool.

use super::AuthError;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::fmt;
use std::sync::OnceLock;

/// Verified against when a login names no stored user
const DUMMY_PASSWORD: &str = "realworld-dummy-password";

/// Argon2 PHC string (`$argon2id$v=19$...`) embedding algorithm, params and salt
#[derive(Clone, PartialEq, Eq, sqlx::Type)]
#[sqlx(transparent)]
pub struct HashedPassword(String);

impl HashedPassword {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for HashedPassword {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword(..)")
    }
}

/// Password hashing service
///
/// Uses Argon2id with a fresh random salt per hash.
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using argon2 (blocking operation)
    pub fn hash(password: &str) -> Result<HashedPassword, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::CryptoFailure(format!("Failed to hash password: {}", e)))?;
        Ok(HashedPassword(hash.to_string()))
    }

    /// Hash a password without blocking the async runtime
    pub async fn hash_async(password: String) -> Result<HashedPassword, AuthError> {
        tokio::task::spawn_blocking(move || Self::hash(&password))
            .await
            .map_err(|e| AuthError::CryptoFailure(format!("Task join error: {}", e)))?
    }

    /// Verify a password against a stored hash (blocking operation)
    ///
    /// A mismatch is `Ok(false)`. Only an unparseable stored hash is an error.
    /// The digest comparison inside argon2 is constant-time.
    pub fn verify(password: &str, hashed: &HashedPassword) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hashed.as_str())
            .map_err(|e| AuthError::CryptoFailure(format!("Invalid hash format: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Verify against `hashed`, or against a fixed dummy hash when there is
    /// no stored user. Both branches cost one Argon2 verification; the
    /// dummy branch always yields `Ok(false)`.
    pub fn verify_or_dummy(password: &str, hashed: Option<&HashedPassword>) -> Result<bool, AuthError> {
        match hashed {
            Some(hashed) => Self::verify(password, hashed),
            None => {
                Self::verify(password, dummy_hash()?)?;
                Ok(false)
            }
        }
    }

    pub async fn verify_or_dummy_async(
        password: String,
        hashed: Option<HashedPassword>,
    ) -> Result<bool, AuthError> {
        tokio::task::spawn_blocking(move || Self::verify_or_dummy(&password, hashed.as_ref()))
            .await
            .map_err(|e| AuthError::CryptoFailure(format!("Task join error: {}", e)))?
    }

    /// Verify a password without blocking the async runtime
    pub async fn verify_async(password: String, hashed: HashedPassword) -> Result<bool, AuthError> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hashed))
            .await
            .map_err(|e| AuthError::CryptoFailure(format!("Task join error: {}", e)))?
    }
}

/// Argon2id hash of `DUMMY_PASSWORD`, computed with the same parameters as
/// real hashes on first use
fn dummy_hash() -> Result<&'static HashedPassword, AuthError> {
    static DUMMY: OnceLock<HashedPassword> = OnceLock::new();

    if let Some(hash) = DUMMY.get() {
        return Ok(hash);
    }
    let hash = PasswordService::hash(DUMMY_PASSWORD)?;
    Ok(DUMMY.get_or_init(|| hash))
}
