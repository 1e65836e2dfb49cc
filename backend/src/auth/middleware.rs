//! Request authentication
//!
//! Resolves `Authorization: Token <jwt>` into the stored user. Handlers
//! that require a user take `AuthUser`; handlers where the viewer is
//! optional take `Option<AuthUser>`, which turns every auth failure into
//! an anonymous request.

use crate::error::ApiError;
use crate::repositories::{UserRecord, UserRepository};
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::debug;
use uuid::Uuid;

/// Literal scheme prefix of the Authorization header
pub const TOKEN_PREFIX: &str = "Token ";

/// Authenticated user resolved from the request token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: UserRecord,
    /// The token the client presented, echoed back by `GET /api/user`
    pub token: String,
}

impl AuthUser {
    #[inline]
    pub fn id(&self) -> Uuid {
        self.user.id
    }
}

/// Pull the raw token out of the Authorization header
pub fn extract_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = header
        .strip_prefix(TOKEN_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Invalid authorization format".to_string()))?;

    Ok(token)
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = extract_token(&parts.headers)?;
        let parsed = app_state.auth().parse(token)?;

        let user = UserRepository::find_by_id(app_state.db(), parsed.subject)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| {
                debug!(subject = %parsed.subject, "Token subject no longer exists");
                ApiError::Unauthorized("Authentication required".to_string())
            })?;

        Ok(AuthUser {
            user,
            token: token.to_string(),
        })
    }
}
