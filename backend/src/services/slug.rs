//! Unique slug derivation
//!
//! A title's base slug is used as-is when free; otherwise a random hex
//! suffix is appended until an unused slug is found. The free check and
//! the write are separate statements, so writers also retry when the
//! database reports the slug as taken.

use crate::error::ApiError;
use crate::repositories::{ArticleRepository, SlugTaken};
use realworld_shared::{slugify, with_random_suffix};
use sqlx::PgPool;
use std::future::Future;
use tracing::debug;

/// Suffixed candidates tried before giving up
pub const MAX_SLUG_ATTEMPTS: usize = 5;

pub struct SlugService;

impl SlugService {
    /// Unused slug for `title`, checked against the articles table
    pub async fn unique_slug(pool: &PgPool, title: &str) -> Result<String, ApiError> {
        Self::unique_slug_with(title, |candidate| async move {
            ArticleRepository::exists_by_slug(pool, &candidate).await
        })
        .await
    }

    /// Unused slug for `title` according to the `exists` predicate
    pub async fn unique_slug_with<F, Fut>(title: &str, mut exists: F) -> Result<String, ApiError>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = anyhow::Result<bool>>,
    {
        let base = slugify(title);
        if !exists(base.clone()).await.map_err(ApiError::Internal)? {
            return Ok(base);
        }

        for _ in 0..MAX_SLUG_ATTEMPTS {
            let candidate = with_random_suffix(&base);
            if !exists(candidate.clone()).await.map_err(ApiError::Internal)? {
                debug!(base = %base, slug = %candidate, "Slug disambiguated");
                return Ok(candidate);
            }
        }

        Err(exhausted(&base))
    }

    /// Run `write` with `slug`, moving to a fresh suffixed candidate of
    /// `title` each time it fails with [`SlugTaken`]. Returns the write's
    /// output and the slug that was stored.
    pub async fn write_with_retry<T, F, Fut>(
        title: &str,
        slug: String,
        mut write: F,
    ) -> Result<(T, String), ApiError>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let base = slugify(title);
        let mut candidate = slug;

        for _ in 0..=MAX_SLUG_ATTEMPTS {
            match write(candidate.clone()).await {
                Ok(output) => return Ok((output, candidate)),
                Err(err) if err.is::<SlugTaken>() => {
                    debug!(slug = %candidate, "Slug taken concurrently, retrying");
                    candidate = with_random_suffix(&base);
                }
                Err(err) => return Err(ApiError::Internal(err)),
            }
        }

        Err(exhausted(&base))
    }
}

fn exhausted(base: &str) -> ApiError {
    ApiError::Internal(anyhow::anyhow!(
        "no free slug for '{}' after {} attempts",
        base,
        MAX_SLUG_ATTEMPTS
    ))
}
