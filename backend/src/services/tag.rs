//! Tag service

use crate::error::ApiError;
use crate::repositories::TagRepository;
use realworld_shared::TagsResponse;
use sqlx::PgPool;

pub struct TagService;

impl TagService {
    pub async fn list(pool: &PgPool) -> Result<TagsResponse, ApiError> {
        let tags = TagRepository::list_in_use(pool)
            .await
            .map_err(ApiError::Internal)?;
        Ok(TagsResponse { tags })
    }
}
