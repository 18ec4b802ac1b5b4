//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - Response DTOs safe for external serialization
//! - Create/update DTOs for inserts and patches

pub mod usage_record;
pub mod user;
