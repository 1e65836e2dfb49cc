//! Profile service: public profiles and follow relationships

use crate::error::ApiError;
use crate::repositories::{UserRecord, UserRepository};
use realworld_shared::ProfileResponse;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

pub struct ProfileService;

impl ProfileService {
    /// Profile of `username` as seen by `viewer`
    pub async fn get(
        pool: &PgPool,
        username: &str,
        viewer: Option<Uuid>,
    ) -> Result<ProfileResponse, ApiError> {
        let user = Self::find(pool, username).await?;

        let following = match viewer {
            Some(viewer) => Some(
                UserRepository::is_following(pool, user.id, viewer)
                    .await
                    .map_err(ApiError::Internal)?,
            ),
            None => None,
        };

        Ok(to_profile(user, following))
    }

    /// Follow `username`. Following twice is not an error.
    pub async fn follow(
        pool: &PgPool,
        username: &str,
        follower: Uuid,
    ) -> Result<ProfileResponse, ApiError> {
        let user = Self::find(pool, username).await?;

        let inserted = UserRepository::add_follower(pool, user.id, follower)
            .await
            .map_err(ApiError::Internal)?;
        if inserted > 0 {
            info!(followee = %user.id, follower = %follower, "Follow added");
        }

        Ok(to_profile(user, Some(true)))
    }

    /// Stop following `username`. Unfollowing twice is not an error.
    pub async fn unfollow(
        pool: &PgPool,
        username: &str,
        follower: Uuid,
    ) -> Result<ProfileResponse, ApiError> {
        let user = Self::find(pool, username).await?;

        let removed = UserRepository::remove_follower(pool, user.id, follower)
            .await
            .map_err(ApiError::Internal)?;
        if removed > 0 {
            info!(followee = %user.id, follower = %follower, "Follow removed");
        }

        Ok(to_profile(user, Some(false)))
    }

    async fn find(pool: &PgPool, username: &str) -> Result<UserRecord, ApiError> {
        UserRepository::find_by_username(pool, username)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(format!("Profile '{}' not found", username)))
    }
}

fn to_profile(user: UserRecord, following: Option<bool>) -> ProfileResponse {
    ProfileResponse {
        username: user.username,
        bio: user.bio,
        image: user.image,
        following,
    }
}
