//! Repository Module
//!
//! Free async functions over `&SqlitePool` (or a caller's transaction).

pub mod price_tier;
pub mod product;

use shared::error::{AppError, ErrorCode};
use shared::pricing::TierValidationError;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Tier set must not be empty")]
    EmptyInput,

    /// The validator rejected the tier set; nothing was written
    #[error("Tier set rejected: {}", summarize(.0))]
    TierRejected(Vec<TierValidationError>),

    /// A storage-side guard (trigger or CHECK constraint) aborted the write
    #[error("Storage guard rejected write: {0}")]
    Backstop(String),

    #[error("Storage operation timed out")]
    Timeout,

    #[error("Database error: {0}")]
    Database(String),
}

impl RepoError {
    /// Infrastructure failures may succeed on retry; rule violations never do
    pub fn is_retryable(&self) -> bool {
        matches!(self, RepoError::Timeout | RepoError::Database(_))
    }
}

fn summarize(errors: &[TierValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => {
                let message = db_err.message();
                if message.starts_with("tier_") || message.starts_with("CHECK constraint failed")
                {
                    RepoError::Backstop(message.to_string())
                } else {
                    RepoError::Database(err.to_string())
                }
            }
            sqlx::Error::PoolTimedOut => RepoError::Timeout,
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(what) => AppError::not_found(what),
            RepoError::EmptyInput => AppError::new(ErrorCode::PriceTierEmptySet),
            RepoError::TierRejected(errors) => errors.into(),
            RepoError::Backstop(rule) => {
                AppError::new(ErrorCode::StorageConstraint).with_detail("rule", rule)
            }
            RepoError::Timeout => AppError::timeout(),
            // Driver messages stay in the log, callers get a generic retry-safe error
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                AppError::new(ErrorCode::DatabaseError).with_detail("retryable", true)
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
