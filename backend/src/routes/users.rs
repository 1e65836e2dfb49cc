//! User registration, login and account routes
//!
//! Password hashing runs on the blocking thread pool, so these handlers
//! never stall the async runtime.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use realworld_shared::{LoginRequest, RegisterRequest, UpdateUserRequest, UserEnvelope, UserResponse};

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(register))
        .route("/users/login", post(login))
        .route("/user", get(current_user).put(update_user))
}

/// POST /api/users
async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UserEnvelope<RegisterRequest>>,
) -> ApiResult<(StatusCode, Json<UserEnvelope<UserResponse>>)> {
    let user = UserService::register(state.db(), state.auth(), req.user).await?;
    Ok((StatusCode::CREATED, Json(UserEnvelope { user })))
}

/// POST /api/users/login
async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UserEnvelope<LoginRequest>>,
) -> ApiResult<Json<UserEnvelope<UserResponse>>> {
    let user = UserService::login(state.db(), state.auth(), req.user).await?;
    Ok(Json(UserEnvelope { user }))
}

/// GET /api/user
async fn current_user(auth: AuthUser) -> Json<UserEnvelope<UserResponse>> {
    Json(UserEnvelope {
        user: UserService::current(auth),
    })
}

/// PUT /api/user
async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<UserEnvelope<UpdateUserRequest>>,
) -> ApiResult<Json<UserEnvelope<UserResponse>>> {
    let user = UserService::update(state.db(), state.auth(), &auth.user, req.user).await?;
    Ok(Json(UserEnvelope { user }))
}
