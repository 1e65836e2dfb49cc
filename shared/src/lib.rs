//! RealWorld Shared Library
//!
//! Wire types, input validation and slug helpers shared by the backend
//! and its test suites.

pub mod errors;
pub mod slug;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use slug::{is_derived_from, slugify, with_random_suffix};
pub use types::*;
