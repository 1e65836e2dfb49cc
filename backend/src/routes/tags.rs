use crate::error::ApiResult;
use crate::services::TagService;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use realworld_shared::TagsResponse;

pub fn tag_routes() -> Router<AppState> {
    Router::new().route("/", get(list_tags))
}

/// GET /api/tags
async fn list_tags(State(state): State<AppState>) -> ApiResult<Json<TagsResponse>> {
    Ok(Json(TagService::list(state.db()).await?))
}
