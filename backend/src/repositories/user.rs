//! User repository for database operations

use crate::auth::HashedPassword;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub password_hash: HashedPassword,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a HashedPassword,
}

/// Input for updating a user. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password_hash: Option<HashedPassword>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

const USER_COLUMNS: &str =
    "id, email, username, password_hash, bio, image, created_at, updated_at";

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Create a new user
    pub async fn create(pool: &PgPool, user: NewUser<'_>) -> Result<UserRecord> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.username)
        .bind(user.email)
        .bind(user.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Find user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Find user by username
    pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Check if email exists
    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(pool)
        .await?;

        Ok(result)
    }

    /// Check if username exists
    pub async fn username_exists(pool: &PgPool, username: &str) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)",
        )
        .bind(username)
        .fetch_one(pool)
        .await?;

        Ok(result)
    }

    /// Apply a partial update and return the new row
    pub async fn update(pool: &PgPool, id: Uuid, changes: UpdateUser) -> Result<UserRecord> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            UPDATE users SET
                email = COALESCE($2, email),
                username = COALESCE($3, username),
                password_hash = COALESCE($4, password_hash),
                bio = COALESCE($5, bio),
                image = COALESCE($6, image),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.email)
        .bind(changes.username)
        .bind(changes.password_hash)
        .bind(changes.bio)
        .bind(changes.image)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Whether `follower` follows `followee`
    pub async fn is_following(pool: &PgPool, followee: Uuid, follower: Uuid) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE followee = $1 AND follower = $2)",
        )
        .bind(followee)
        .bind(follower)
        .fetch_one(pool)
        .await?;

        Ok(result)
    }

    /// Record a follow. Following twice is a no-op.
    pub async fn add_follower(pool: &PgPool, followee: Uuid, follower: Uuid) -> Result<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO follows (followee, follower)
            VALUES ($1, $2)
            ON CONFLICT (followee, follower) DO NOTHING
            "#,
        )
        .bind(followee)
        .bind(follower)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Remove a follow. Removing a missing follow is a no-op.
    pub async fn remove_follower(pool: &PgPool, followee: Uuid, follower: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM follows WHERE followee = $1 AND follower = $2")
            .bind(followee)
            .bind(follower)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
