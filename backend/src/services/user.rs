//! User service for registration, login and account updates
//!
//! Password hashing/verification runs on the blocking thread pool; tokens
//! are signed with the pre-computed keys held by `Auth`.

use crate::auth::{Auth, AuthUser};
use crate::error::ApiError;
use crate::repositories::{NewUser, UpdateUser, UserRecord, UserRepository};
use realworld_shared::validation::{validate_email, validate_password, validate_username};
use realworld_shared::{FieldError, LoginRequest, RegisterRequest, UpdateUserRequest, UserResponse};
use sqlx::PgPool;
use tracing::{info, warn};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Register a new user and sign them in
    pub async fn register(
        pool: &PgPool,
        auth: &Auth,
        req: RegisterRequest,
    ) -> Result<UserResponse, ApiError> {
        validate_username(&req.username)?;
        validate_email(&req.email)?;
        validate_password(&req.password)?;

        if UserRepository::email_exists(pool, &req.email)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(FieldError::taken("email").into());
        }
        if UserRepository::username_exists(pool, &req.username)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(FieldError::taken("username").into());
        }

        let password_hash = auth.encrypt_password_async(req.password).await?;

        let user = UserRepository::create(
            pool,
            NewUser {
                username: &req.username,
                email: &req.email,
                password_hash: &password_hash,
            },
        )
        .await
        .map_err(map_unique_violation)?;

        let token = auth.create_token(user.id)?;
        info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(to_response(user, token))
    }

    /// Login with email and password
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(
        pool: &PgPool,
        auth: &Auth,
        req: LoginRequest,
    ) -> Result<UserResponse, ApiError> {
        let user = UserRepository::find_by_email(pool, &req.email)
            .await
            .map_err(ApiError::Internal)?;

        // Unknown emails are checked against a dummy hash so both failure
        // paths take the same time
        let valid = auth
            .verify_login_async(req.password, user.as_ref().map(|u| u.password_hash.clone()))
            .await?;

        let user = match (user, valid) {
            (Some(user), true) => user,
            (Some(user), false) => {
                warn!(user_id = %user.id, reason = "wrong_password", "Login failed");
                return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
            (None, _) => {
                warn!(reason = "unknown_email", "Login failed");
                return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };

        let token = auth.create_token(user.id)?;
        info!(user_id = %user.id, "User logged in");

        Ok(to_response(user, token))
    }

    /// The resolved request user, echoing the token they presented
    pub fn current(auth_user: AuthUser) -> UserResponse {
        to_response(auth_user.user, auth_user.token)
    }

    /// Apply a partial update to the current user
    pub async fn update(
        pool: &PgPool,
        auth: &Auth,
        current: &UserRecord,
        req: UpdateUserRequest,
    ) -> Result<UserResponse, ApiError> {
        let mut changes = UpdateUser {
            bio: req.bio,
            image: req.image,
            ..Default::default()
        };

        if let Some(email) = req.email.filter(|email| *email != current.email) {
            validate_email(&email)?;
            if UserRepository::email_exists(pool, &email)
                .await
                .map_err(ApiError::Internal)?
            {
                return Err(FieldError::taken("email").into());
            }
            changes.email = Some(email);
        }

        if let Some(username) = req.username.filter(|name| *name != current.username) {
            validate_username(&username)?;
            if UserRepository::username_exists(pool, &username)
                .await
                .map_err(ApiError::Internal)?
            {
                return Err(FieldError::taken("username").into());
            }
            changes.username = Some(username);
        }

        if let Some(password) = req.password {
            validate_password(&password)?;
            changes.password_hash = Some(auth.encrypt_password_async(password).await?);
        }

        let user = UserRepository::update(pool, current.id, changes)
            .await
            .map_err(map_unique_violation)?;

        let token = auth.create_token(user.id)?;
        info!(user_id = %user.id, "User updated");

        Ok(to_response(user, token))
    }
}

fn to_response(user: UserRecord, token: String) -> UserResponse {
    UserResponse {
        email: user.email,
        token,
        username: user.username,
        bio: user.bio,
        image: user.image,
    }
}

/// Turn a lost uniqueness race into the same field error the pre-check gives
fn map_unique_violation(err: anyhow::Error) -> ApiError {
    if let Some(db_err) = err
        .downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
    {
        if db_err.is_unique_violation() {
            match db_err.constraint() {
                Some("users_email_key") => return FieldError::taken("email").into(),
                Some("users_username_key") => return FieldError::taken("username").into(),
                _ => {}
            }
        }
    }
    ApiError::Internal(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_error_is_internal() {
        let err = map_unique_violation(anyhow::anyhow!("pool timed out"));
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn test_row_not_found_is_internal() {
        let err = map_unique_violation(sqlx::Error::RowNotFound.into());
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
