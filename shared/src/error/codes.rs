//! Unified error codes for the storefront
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 6xxx: Product and pricing errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so that the admin UI can
/// switch on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,

    // Price tiers (64xx)
    /// Two tiers cover the same quantity
    PriceTierOverlap = 6401,
    /// Quantity bands are not contiguous
    PriceTierGap = 6402,
    /// Invalid minimum quantity
    PriceTierInvalidMin = 6403,
    /// Invalid maximum quantity
    PriceTierInvalidMax = 6404,
    /// Invalid unit price
    PriceTierInvalidPrice = 6405,
    /// Invalid discounted unit price
    PriceTierInvalidDiscount = 6406,
    /// Tier set is empty
    PriceTierEmptySet = 6407,
    /// Operation does not match the product's pricing mode
    PricingModeMismatch = 6410,
    /// Mode change would discard data and needs confirmation
    PricingModeConfirmationRequired = 6411,
    /// Purchase quantity must be positive
    InvalidQuantity = 6412,
    /// Price or total exceeds the representable money range
    PriceOutOfRange = 6413,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Storage operation timed out
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Storage-side constraint rejected a write
    StorageConstraint = 9406,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",

            // Product
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::PriceTierOverlap => "Price tiers overlap",
            ErrorCode::PriceTierGap => "Price tiers leave a quantity gap",
            ErrorCode::PriceTierInvalidMin => "Invalid tier minimum quantity",
            ErrorCode::PriceTierInvalidMax => "Invalid tier maximum quantity",
            ErrorCode::PriceTierInvalidPrice => "Invalid tier unit price",
            ErrorCode::PriceTierInvalidDiscount => "Invalid tier discounted price",
            ErrorCode::PriceTierEmptySet => "At least one price tier is required",
            ErrorCode::PricingModeMismatch => "Product is not in the required pricing mode",
            ErrorCode::PricingModeConfirmationRequired => {
                "Changing pricing mode will discard existing pricing data"
            }
            ErrorCode::InvalidQuantity => "Quantity must be at least 1",
            ErrorCode::PriceOutOfRange => "Price is out of range for this quantity",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::StorageConstraint => "Storage constraint violated",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),

            // Product
            6001 => Ok(ErrorCode::ProductNotFound),
            6401 => Ok(ErrorCode::PriceTierOverlap),
            6402 => Ok(ErrorCode::PriceTierGap),
            6403 => Ok(ErrorCode::PriceTierInvalidMin),
            6404 => Ok(ErrorCode::PriceTierInvalidMax),
            6405 => Ok(ErrorCode::PriceTierInvalidPrice),
            6406 => Ok(ErrorCode::PriceTierInvalidDiscount),
            6407 => Ok(ErrorCode::PriceTierEmptySet),
            6410 => Ok(ErrorCode::PricingModeMismatch),
            6411 => Ok(ErrorCode::PricingModeConfirmationRequired),
            6412 => Ok(ErrorCode::InvalidQuantity),
            6413 => Ok(ErrorCode::PriceOutOfRange),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9406 => Ok(ErrorCode::StorageConstraint),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
