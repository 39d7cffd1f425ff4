//! Data models
//!
//! Shared between the client crates and their tests.
//! All IDs are `i64` (backend `BIGINT` identity column).

pub mod employee;

// Re-exports
pub use employee::*;
