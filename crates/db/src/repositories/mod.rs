//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod usage_repo;
pub mod user_repo;

pub use usage_repo::UsageRepo;
pub use user_repo::UserRepo;
