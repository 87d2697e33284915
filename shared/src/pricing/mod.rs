//! Tiered pricing engine
//!
//! Pure rules shared by the storefront server and its clients:
//! - [`validator`]: structural and price checks over a tier set
//! - [`resolver`]: unit price / total / savings for a purchase quantity
//! - [`mode`]: guarded switching between simple and tiered pricing
//!
//! Prices travel as `f64`; every computation runs on `Decimal` and is
//! rounded to 2 decimal places on the way out.

pub mod mode;
pub mod resolver;
pub mod validator;

pub use mode::{
    DiscardedData, ModeChangeConfirmation, ModeChangeDecision, ModeChangeError, ModeTransition,
    PricingModeCoordinator,
};
pub use resolver::{MatchRule, PricingError, PricingResult, resolve, resolve_with};
pub use validator::{TierErrorKind, TierValidationError, is_valid, sort_tiers, validate};

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// Read access to the pricing fields of a tier, persisted or draft
pub trait TierBand {
    fn min_quantity(&self) -> i64;
    /// `None` = unbounded
    fn max_quantity(&self) -> Option<i64>;
    fn unit_price(&self) -> f64;
    fn discounted_unit_price(&self) -> Option<f64>;

    /// Upper bound with unbounded mapped to `i64::MAX`
    fn upper_bound(&self) -> i64 {
        self.max_quantity().unwrap_or(i64::MAX)
    }

    /// Price a buyer actually pays per unit in this band
    fn effective_unit_price(&self) -> f64 {
        self.discounted_unit_price().unwrap_or(self.unit_price())
    }
}

/// Optional set-level rules on top of the structural ones
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierPolicy {
    /// Lowest band must start at quantity 1
    pub require_start_at_one: bool,
    /// Bands must follow each other with no uncovered quantity
    pub require_contiguous: bool,
}

impl TierPolicy {
    /// Structural rules only
    pub const fn relaxed() -> Self {
        Self {
            require_start_at_one: false,
            require_contiguous: false,
        }
    }

    /// Bands start at 1 and cover every quantity
    pub const fn strict() -> Self {
        Self {
            require_start_at_one: true,
            require_contiguous: true,
        }
    }
}

const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation.
///
/// `None` for NaN, infinities and magnitudes `Decimal` cannot hold.
#[inline]
pub(crate) fn to_decimal(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value)
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub(crate) fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_default()
}

#[inline]
pub(crate) fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}
