//! Article routes: CRUD, favorites, listing and feed

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::services::ArticleService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use realworld_shared::{
    ArticleEnvelope, ArticleListQuery, ArticleResponse, FeedQuery, MultipleArticlesResponse,
    NewArticleRequest, UpdateArticleRequest,
};

type ArticleJson = Json<ArticleEnvelope<ArticleResponse>>;

/// Create article routes
pub fn article_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_articles).post(create_article))
        .route("/feed", get(feed))
        .route(
            "/:slug",
            get(get_article).put(update_article).delete(delete_article),
        )
        .route("/:slug/favorite", post(favorite).delete(unfavorite))
}

/// GET /api/articles
async fn list_articles(
    State(state): State<AppState>,
    viewer: Option<AuthUser>,
    Query(query): Query<ArticleListQuery>,
) -> ApiResult<Json<MultipleArticlesResponse>> {
    let articles =
        ArticleService::list(state.db(), query, viewer.as_ref().map(AuthUser::id)).await?;
    Ok(Json(articles))
}

/// GET /api/articles/feed
async fn feed(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<FeedQuery>,
) -> ApiResult<Json<MultipleArticlesResponse>> {
    let articles = ArticleService::feed(state.db(), auth.id(), query).await?;
    Ok(Json(articles))
}

/// POST /api/articles
async fn create_article(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<ArticleEnvelope<NewArticleRequest>>,
) -> ApiResult<(StatusCode, ArticleJson)> {
    let article = ArticleService::create(state.db(), &auth.user, req.article).await?;
    Ok((StatusCode::CREATED, Json(ArticleEnvelope { article })))
}

/// GET /api/articles/:slug
async fn get_article(
    State(state): State<AppState>,
    viewer: Option<AuthUser>,
    Path(slug): Path<String>,
) -> ApiResult<ArticleJson> {
    let article = ArticleService::get(state.db(), &slug, viewer.as_ref().map(AuthUser::id)).await?;
    Ok(Json(ArticleEnvelope { article }))
}

/// PUT /api/articles/:slug
async fn update_article(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
    ApiJson(req): ApiJson<ArticleEnvelope<UpdateArticleRequest>>,
) -> ApiResult<ArticleJson> {
    let article = ArticleService::update(state.db(), &slug, &auth.user, req.article).await?;
    Ok(Json(ArticleEnvelope { article }))
}

/// DELETE /api/articles/:slug
async fn delete_article(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
) -> ApiResult<StatusCode> {
    ArticleService::delete(state.db(), &slug, &auth.user).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/articles/:slug/favorite
async fn favorite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
) -> ApiResult<ArticleJson> {
    let article = ArticleService::favorite(state.db(), &slug, auth.id()).await?;
    Ok(Json(ArticleEnvelope { article }))
}

/// DELETE /api/articles/:slug/favorite
async fn unfavorite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
) -> ApiResult<ArticleJson> {
    let article = ArticleService::unfavorite(state.db(), &slug, auth.id()).await?;
    Ok(Json(ArticleEnvelope { article }))
}
