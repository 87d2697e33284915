//! Data models
//!
//! Shared between the storefront server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod price_tier;
pub mod product;

// Re-exports
pub use price_tier::*;
pub use product::*;
