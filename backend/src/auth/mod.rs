//! Authentication module
//!
//! Argon2id password hashing, HS256 JWT issuance/parsing, and the
//! `Authorization: Token <jwt>` request resolver.

mod error;
mod jwt;
mod middleware;
mod password;
mod service;

pub use error::AuthError;
pub use jwt::{Claims, JwtKeys, JwtService, Token};
pub use middleware::{extract_token, AuthUser, TOKEN_PREFIX};
pub use password::{HashedPassword, PasswordService};
pub use service::Auth;
