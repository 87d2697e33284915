//! Shared types for the storefront
//!
//! Models, the unified error system and the tiered pricing engine. Everything
//! here is free of I/O so that the server and its clients run the same rules.

pub mod error;
pub mod models;
pub mod pricing;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
