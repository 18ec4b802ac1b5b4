//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a Bearer session token.
//! - [`auth::AdminUser`] -- Additionally requires the admin flag.

pub mod auth;
