//! Article repository for database operations
//!
//! Reads go through a single projection query that assembles tags, author
//! profile and favorite state for an optional viewer.

use anyhow::Result;
use chrono::{DateTime, Utc};
use realworld_shared::Page;
use sqlx::{PgPool, Postgres, QueryBuilder};
use thiserror::Error;
use uuid::Uuid;

/// Constraint guarding slug uniqueness
const SLUG_CONSTRAINT: &str = "articles_slug_key";

/// A write lost the race for its slug
#[derive(Debug, Error)]
#[error("slug '{0}' is already taken")]
pub struct SlugTaken(pub String);

fn map_slug_conflict(err: sqlx::Error, slug: &str) -> anyhow::Error {
    let taken = err.as_database_error().is_some_and(|db| {
        db.is_unique_violation() && db.constraint() == Some(SLUG_CONSTRAINT)
    });

    if taken {
        SlugTaken(slug.to_string()).into()
    } else {
        err.into()
    }
}

/// Article row joined with everything needed to render it for one viewer
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ArticleRecord {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_username: String,
    pub author_bio: Option<String>,
    pub author_image: Option<String>,
    pub tag_list: Vec<String>,
    pub favorites_count: i64,
    /// Viewer has favorited the article. Always false for anonymous viewers.
    pub favorited: bool,
    /// Viewer follows the author. Always false for anonymous viewers.
    pub following: bool,
}

/// Input for creating an article
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub author_id: Uuid,
    pub tags: Vec<String>,
}

/// Fully resolved article update
#[derive(Debug, Clone)]
pub struct ArticleChanges {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
}

/// Listing filters. All set filters must match.
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    pub tag: Option<String>,
    pub author: Option<String>,
    pub favorited_by: Option<String>,
    /// Only articles by authors this user follows
    pub followed_by: Option<Uuid>,
}

fn push_projection(qb: &mut QueryBuilder<'_, Postgres>, viewer: Option<Uuid>) {
    qb.push(
        r#"
        SELECT a.id, a.slug, a.title, a.description, a.body, a.created_at, a.updated_at,
               a.author_id, u.username AS author_username, u.bio AS author_bio, u.image AS author_image,
               ARRAY(SELECT atg.tag FROM article_tags atg WHERE atg.article_id = a.id ORDER BY atg.tag) AS tag_list,
               (SELECT COUNT(*) FROM favorites f WHERE f.article_id = a.id) AS favorites_count,
               EXISTS(SELECT 1 FROM favorites f WHERE f.article_id = a.id AND f.user_id = "#,
    );
    qb.push_bind(viewer);
    qb.push(
        r#") AS favorited,
               EXISTS(SELECT 1 FROM follows fl WHERE fl.followee = a.author_id AND fl.follower = "#,
    );
    qb.push_bind(viewer);
    qb.push(") AS following FROM articles a JOIN users u ON u.id = a.author_id");
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &ArticleFilter) {
    qb.push(" WHERE TRUE");

    if let Some(tag) = &filter.tag {
        qb.push(" AND EXISTS(SELECT 1 FROM article_tags t WHERE t.article_id = a.id AND t.tag = ");
        qb.push_bind(tag.clone());
        qb.push(")");
    }
    if let Some(author) = &filter.author {
        qb.push(" AND u.username = ");
        qb.push_bind(author.clone());
    }
    if let Some(username) = &filter.favorited_by {
        qb.push(
            " AND EXISTS(SELECT 1 FROM favorites fav JOIN users fu ON fu.id = fav.user_id \
             WHERE fav.article_id = a.id AND fu.username = ",
        );
        qb.push_bind(username.clone());
        qb.push(")");
    }
    if let Some(follower) = filter.followed_by {
        qb.push(" AND EXISTS(SELECT 1 FROM follows ff WHERE ff.followee = a.author_id AND ff.follower = ");
        qb.push_bind(follower);
        qb.push(")");
    }
}

/// Article repository for database operations
pub struct ArticleRepository;

impl ArticleRepository {
    /// Insert an article with its tags in one transaction.
    ///
    /// Unknown tags are created; duplicate tags must be removed by the caller.
    /// A slug collision surfaces as [`SlugTaken`].
    pub async fn create(pool: &PgPool, article: &NewArticle) -> Result<Uuid> {
        let mut tx = pool.begin().await?;

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO articles (slug, title, description, body, author_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&article.slug)
        .bind(&article.title)
        .bind(&article.description)
        .bind(&article.body)
        .bind(article.author_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_slug_conflict(e, &article.slug))?;

        if !article.tags.is_empty() {
            sqlx::query("INSERT INTO tags (name) SELECT * FROM UNNEST($1::text[]) ON CONFLICT (name) DO NOTHING")
                .bind(&article.tags)
                .execute(&mut *tx)
                .await?;

            sqlx::query(
                r#"
                INSERT INTO article_tags (article_id, tag)
                SELECT $1, tag FROM UNNEST($2::text[]) AS tag
                ON CONFLICT (article_id, tag) DO NOTHING
                "#,
            )
            .bind(id)
            .bind(&article.tags)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(id)
    }

    /// Check if a slug is already in use
    pub async fn exists_by_slug(pool: &PgPool, slug: &str) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM articles WHERE slug = $1)",
        )
        .bind(slug)
        .fetch_one(pool)
        .await?;

        Ok(result)
    }

    /// Fetch an article as seen by `viewer`
    pub async fn find_by_slug(
        pool: &PgPool,
        slug: &str,
        viewer: Option<Uuid>,
    ) -> Result<Option<ArticleRecord>> {
        let mut qb = QueryBuilder::new("");
        push_projection(&mut qb, viewer);
        qb.push(" WHERE a.slug = ");
        qb.push_bind(slug.to_string());

        let article = qb
            .build_query_as::<ArticleRecord>()
            .fetch_optional(pool)
            .await?;

        Ok(article)
    }

    /// Page of matching articles, newest first
    pub async fn list(
        pool: &PgPool,
        filter: &ArticleFilter,
        viewer: Option<Uuid>,
        page: Page,
    ) -> Result<Vec<ArticleRecord>> {
        let mut qb = QueryBuilder::new("");
        push_projection(&mut qb, viewer);
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY a.created_at DESC LIMIT ");
        qb.push_bind(page.limit);
        qb.push(" OFFSET ");
        qb.push_bind(page.offset);

        let articles = qb
            .build_query_as::<ArticleRecord>()
            .fetch_all(pool)
            .await?;

        Ok(articles)
    }

    /// Total number of articles matching `filter`
    pub async fn count(pool: &PgPool, filter: &ArticleFilter) -> Result<i64> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM articles a JOIN users u ON u.id = a.author_id");
        push_filter(&mut qb, filter);

        let count = qb.build_query_scalar::<i64>().fetch_one(pool).await?;

        Ok(count)
    }

    /// Overwrite the editable columns and bump `updated_at`.
    /// A slug collision surfaces as [`SlugTaken`].
    pub async fn update(pool: &PgPool, id: Uuid, changes: &ArticleChanges) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE articles SET
                slug = $2,
                title = $3,
                description = $4,
                body = $5,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&changes.slug)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(&changes.body)
        .execute(pool)
        .await
        .map_err(|e| map_slug_conflict(e, &changes.slug))?;

        Ok(())
    }

    /// Delete an article. Tags links and favorites cascade.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Mark an article as favorited. Idempotent.
    pub async fn add_favorite(pool: &PgPool, article_id: Uuid, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO favorites (article_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (article_id, user_id) DO NOTHING
            "#,
        )
        .bind(article_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Remove a favorite. Idempotent.
    pub async fn remove_favorite(pool: &PgPool, article_id: Uuid, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM favorites WHERE article_id = $1 AND user_id = $2")
            .bind(article_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
