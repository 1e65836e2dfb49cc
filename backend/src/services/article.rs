//! Article service: CRUD, favorites and listings

use crate::error::ApiError;
use crate::repositories::{
    ArticleChanges, ArticleFilter, ArticleRecord, ArticleRepository, NewArticle, UserRecord,
};
use crate::services::SlugService;
use realworld_shared::validation::{validate_required, validate_tags};
use realworld_shared::{
    is_derived_from, slugify, ArticleListQuery, ArticleResponse, FeedQuery,
    MultipleArticlesResponse, NewArticleRequest, Page, ProfileResponse, UpdateArticleRequest,
};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

pub struct ArticleService;

impl ArticleService {
    /// Publish a new article authored by `author`
    pub async fn create(
        pool: &PgPool,
        author: &UserRecord,
        req: NewArticleRequest,
    ) -> Result<ArticleResponse, ApiError> {
        validate_required("title", &req.title)?;
        validate_required("description", &req.description)?;
        validate_required("body", &req.body)?;
        let tags = normalize_tags(req.tag_list);
        validate_tags(&tags)?;

        let first = SlugService::unique_slug(pool, &req.title).await?;
        let article = NewArticle {
            slug: first.clone(),
            title: req.title,
            description: req.description,
            body: req.body,
            author_id: author.id,
            tags,
        };

        let (id, slug) = SlugService::write_with_retry(&article.title, first, |slug| {
            let attempt = NewArticle {
                slug,
                ..article.clone()
            };
            async move { ArticleRepository::create(pool, &attempt).await }
        })
        .await?;

        info!(article_id = %id, slug = %slug, author = %author.id, "Article created");

        Self::get(pool, &slug, Some(author.id)).await
    }

    /// Article by slug as seen by `viewer`
    pub async fn get(
        pool: &PgPool,
        slug: &str,
        viewer: Option<Uuid>,
    ) -> Result<ArticleResponse, ApiError> {
        let record = find(pool, slug, viewer).await?;
        Ok(to_response(record, viewer))
    }

    /// Check that `user` may apply `req` to the article at `slug` and
    /// resolve the resulting column values.
    ///
    /// A title whose slug base differs from the current slug yields a fresh
    /// unique slug; otherwise the slug is kept.
    pub async fn validate_update(
        pool: &PgPool,
        slug: &str,
        user: &UserRecord,
        req: UpdateArticleRequest,
    ) -> Result<(ArticleRecord, ArticleChanges), ApiError> {
        let record = find(pool, slug, Some(user.id)).await?;
        ensure_author(&record, user)?;

        if let Some(title) = &req.title {
            validate_required("title", title)?;
        }
        if let Some(description) = &req.description {
            validate_required("description", description)?;
        }
        if let Some(body) = &req.body {
            validate_required("body", body)?;
        }

        let new_slug = match &req.title {
            Some(title) if needs_new_slug(&record, title) => {
                SlugService::unique_slug(pool, title).await?
            }
            _ => record.slug.clone(),
        };

        let changes = ArticleChanges {
            slug: new_slug,
            title: req.title.unwrap_or_else(|| record.title.clone()),
            description: req.description.unwrap_or_else(|| record.description.clone()),
            body: req.body.unwrap_or_else(|| record.body.clone()),
        };

        Ok((record, changes))
    }

    /// Update an article owned by `user`
    pub async fn update(
        pool: &PgPool,
        slug: &str,
        user: &UserRecord,
        req: UpdateArticleRequest,
    ) -> Result<ArticleResponse, ApiError> {
        let (record, changes) = Self::validate_update(pool, slug, user, req).await?;

        let id = record.id;
        let first = changes.slug.clone();
        let ((), slug) = SlugService::write_with_retry(&changes.title, first, |slug| {
            let attempt = ArticleChanges {
                slug,
                ..changes.clone()
            };
            async move { ArticleRepository::update(pool, id, &attempt).await }
        })
        .await?;

        info!(article_id = %id, slug = %slug, "Article updated");

        Self::get(pool, &slug, Some(user.id)).await
    }

    /// Delete an article owned by `user`
    pub async fn delete(pool: &PgPool, slug: &str, user: &UserRecord) -> Result<(), ApiError> {
        let record = find(pool, slug, Some(user.id)).await?;
        ensure_author(&record, user)?;

        ArticleRepository::delete(pool, record.id)
            .await
            .map_err(ApiError::Internal)?;

        info!(article_id = %record.id, slug = %record.slug, "Article deleted");
        Ok(())
    }

    pub async fn favorite(pool: &PgPool, slug: &str, user: Uuid) -> Result<ArticleResponse, ApiError> {
        let record = find(pool, slug, Some(user)).await?;
        ArticleRepository::add_favorite(pool, record.id, user)
            .await
            .map_err(ApiError::Internal)?;
        Self::get(pool, slug, Some(user)).await
    }

    pub async fn unfavorite(
        pool: &PgPool,
        slug: &str,
        user: Uuid,
    ) -> Result<ArticleResponse, ApiError> {
        let record = find(pool, slug, Some(user)).await?;
        ArticleRepository::remove_favorite(pool, record.id, user)
            .await
            .map_err(ApiError::Internal)?;
        Self::get(pool, slug, Some(user)).await
    }

    /// Filtered listing, newest first
    pub async fn list(
        pool: &PgPool,
        query: ArticleListQuery,
        viewer: Option<Uuid>,
    ) -> Result<MultipleArticlesResponse, ApiError> {
        let page = Page::new(query.limit, query.offset);
        let filter = ArticleFilter {
            tag: query.tag,
            author: query.author,
            favorited_by: query.favorited,
            followed_by: None,
        };

        Self::page(pool, &filter, viewer, page).await
    }

    /// Articles by authors `user` follows, newest first
    pub async fn feed(
        pool: &PgPool,
        user: Uuid,
        query: FeedQuery,
    ) -> Result<MultipleArticlesResponse, ApiError> {
        let page = Page::new(query.limit, query.offset);
        let filter = ArticleFilter {
            followed_by: Some(user),
            ..Default::default()
        };

        Self::page(pool, &filter, Some(user), page).await
    }

    async fn page(
        pool: &PgPool,
        filter: &ArticleFilter,
        viewer: Option<Uuid>,
        page: Page,
    ) -> Result<MultipleArticlesResponse, ApiError> {
        let (records, total) = tokio::try_join!(
            ArticleRepository::list(pool, filter, viewer, page),
            ArticleRepository::count(pool, filter),
        )
        .map_err(ApiError::Internal)?;

        Ok(MultipleArticlesResponse {
            articles: records
                .into_iter()
                .map(|record| to_response(record, viewer))
                .collect(),
            articles_count: total,
        })
    }
}

async fn find(pool: &PgPool, slug: &str, viewer: Option<Uuid>) -> Result<ArticleRecord, ApiError> {
    ArticleRepository::find_by_slug(pool, slug, viewer)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound(format!("Article '{}' not found", slug)))
}

fn ensure_author(record: &ArticleRecord, user: &UserRecord) -> Result<(), ApiError> {
    if record.author_id == user.id {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Only the author can modify this article".to_string(),
        ))
    }
}

/// A retitle that slugifies to the current base keeps the current slug
fn needs_new_slug(record: &ArticleRecord, title: &str) -> bool {
    title != record.title && !is_derived_from(&record.slug, &slugify(title))
}

/// Trim tags and drop duplicates, keeping first-seen order
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

fn to_response(record: ArticleRecord, viewer: Option<Uuid>) -> ArticleResponse {
    ArticleResponse {
        slug: record.slug,
        title: record.title,
        description: record.description,
        body: record.body,
        tag_list: record.tag_list,
        created_at: record.created_at,
        updated_at: record.updated_at,
        favorited: record.favorited,
        favorites_count: record.favorites_count,
        author: ProfileResponse {
            username: record.author_username,
            bio: record.author_bio,
            image: record.author_image,
            following: viewer.map(|_| record.following),
        },
    }
}
