//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod article;
pub mod tag;
pub mod user;

pub use article::{
    ArticleChanges, ArticleFilter, ArticleRecord, ArticleRepository, NewArticle, SlugTaken,
};
pub use tag::TagRepository;
pub use user::{NewUser, UpdateUser, UserRecord, UserRepository};
