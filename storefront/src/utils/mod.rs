//! Utilities: error re-exports and logging

pub mod logger;

// Unified error types (shared with API clients)
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
