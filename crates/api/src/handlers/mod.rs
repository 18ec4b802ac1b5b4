//! HTTP request handlers, one module per resource.
//!
//! Handlers delegate persistence to the repositories in `clipbrief_db`,
//! media work to `clipbrief_pipeline`, and map errors via [`AppError`].
//!
//! [`AppError`]: crate::error::AppError

pub mod account;
pub mod admin;
pub mod auth;
pub mod videos;
