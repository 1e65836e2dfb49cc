//! Public profile and follow routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::ProfileService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use realworld_shared::{ProfileEnvelope, ProfileResponse};

type ProfileJson = Json<ProfileEnvelope<ProfileResponse>>;

/// Create profile routes
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/:username", get(get_profile))
        .route("/:username/follow", post(follow).delete(unfollow))
}

/// GET /api/profiles/:username
async fn get_profile(
    State(state): State<AppState>,
    viewer: Option<AuthUser>,
    Path(username): Path<String>,
) -> ApiResult<ProfileJson> {
    let profile =
        ProfileService::get(state.db(), &username, viewer.as_ref().map(AuthUser::id)).await?;
    Ok(Json(ProfileEnvelope { profile }))
}

/// POST /api/profiles/:username/follow
async fn follow(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(username): Path<String>,
) -> ApiResult<ProfileJson> {
    let profile = ProfileService::follow(state.db(), &username, auth.id()).await?;
    Ok(Json(ProfileEnvelope { profile }))
}

/// DELETE /api/profiles/:username/follow
async fn unfollow(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(username): Path<String>,
) -> ApiResult<ProfileJson> {
    let profile = ProfileService::unfollow(state.db(), &username, auth.id()).await?;
    Ok(Json(ProfileEnvelope { profile }))
}
