//! Business logic services
//!
//! Services validate input and coordinate one or two repository calls.
//! Repositories speak `anyhow`; services translate into `ApiError`.

pub mod article;
pub mod profile;
pub mod slug;
pub mod tag;
pub mod user;

pub use article::ArticleService;
pub use profile::ProfileService;
pub use slug::SlugService;
pub use tag::TagService;
pub use user::UserService;
