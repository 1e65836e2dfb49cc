//! Application state management
//!
//! Shared state passed to every handler via axum's state extraction.
//! All fields are cheap to clone and read-only during request handling.

use crate::auth::Auth;
use crate::config::AppConfig;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
///
/// - `db`: PgPool is internally Arc'd, cloning is O(1)
/// - `config`: wrapped in Arc
/// - `auth`: pre-computed JWT keys wrapped in Arc
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub auth: Auth,
}

impl AppState {
    /// Create a new application state
    ///
    /// Derives the token keys from the configured secret. Call once at
    /// startup; the secret is not retained anywhere else.
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        let auth = Auth::new(&config.jwt.secret, config.jwt.token_ttl_secs);

        Self {
            db,
            config: Arc::new(config),
            auth,
        }
    }

    #[inline]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn auth(&self) -> &Auth {
        &self.auth
    }
}
