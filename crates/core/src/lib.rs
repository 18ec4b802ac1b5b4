//! Shared domain primitives for the clipbrief platform.
//!
//! This crate has zero internal dependencies so every other workspace
//! member can use its error taxonomy and type aliases.

pub mod error;
pub mod types;
