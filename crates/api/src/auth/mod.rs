//! Authentication and authorization primitives.
//!
//! - [`assertion`] -- HMAC verification of identity-provider login payloads.
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`session`] -- HS256 session-token generation and validation.

pub mod assertion;
pub mod password;
pub mod session;
