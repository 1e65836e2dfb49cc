//! Tag repository

use anyhow::Result;
use sqlx::PgPool;

pub struct TagRepository;

impl TagRepository {
    /// Tags attached to at least one article, alphabetically
    pub async fn list_in_use(pool: &PgPool) -> Result<Vec<String>> {
        let tags = sqlx::query_scalar::<_, String>(
            r#"
            SELECT t.name
            FROM tags t
            WHERE EXISTS(SELECT 1 FROM article_tags atg WHERE atg.tag = t.name)
            ORDER BY t.name
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(tags)
    }
}
