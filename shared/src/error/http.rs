//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound | Self::ProductNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::PricingModeMismatch
            | Self::PricingModeConfirmationRequired => StatusCode::CONFLICT,

            // 422 Unprocessable (tier set breaks a structural rule)
            Self::PriceTierOverlap
            | Self::PriceTierGap
            | Self::PriceTierInvalidMin
            | Self::PriceTierInvalidMax
            | Self::PriceTierInvalidPrice
            | Self::PriceTierInvalidDiscount
            | Self::PriceTierEmptySet
            | Self::PriceOutOfRange
            | Self::StorageConstraint => StatusCode::UNPROCESSABLE_ENTITY,

            // 503 Service Unavailable (transient errors, client can retry)
            Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (default for validation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
