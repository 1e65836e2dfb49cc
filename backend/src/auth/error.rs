//! Authentication error kinds

use thiserror::Error;

/// Failures raised by the auth core.
///
/// `InvalidToken` is expected adversarial input and maps to 401.
/// `CryptoFailure` means the primitive itself failed and maps to 500.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Crypto failure: {0}")]
    CryptoFailure(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

impl AuthError {
    pub fn is_invalid_token(&self) -> bool {
        matches!(self, AuthError::InvalidToken(_))
    }
}
