//! Unit price resolution for a purchase quantity

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{TierBand, round_money, to_decimal, to_f64};
use crate::error::{AppError, ErrorCode};
use crate::models::PriceTier;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("Quantity must be at least 1 (got {0})")]
    InvalidQuantity(i64),
    /// A price or total does not fit the money range
    #[error("Price out of range for quantity {quantity}")]
    Overflow { quantity: i64 },
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::InvalidQuantity(q) => {
                AppError::with_message(ErrorCode::InvalidQuantity, err.to_string())
                    .with_detail("quantity", q)
            }
            PricingError::Overflow { quantity } => {
                AppError::with_message(ErrorCode::PriceOutOfRange, err.to_string())
                    .with_detail("quantity", quantity)
            }
        }
    }
}

/// How a quantity is matched to a band
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// Highest band whose `min_quantity` has been reached
    #[default]
    Threshold,
    /// Band whose `[min, max]` contains the quantity; the cheapest one wins
    /// if several do
    RangeInclusive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult<T = PriceTier> {
    pub unit_price: f64,
    pub total_price: f64,
    /// `None` when the fallback price was used
    pub applied_tier: Option<T>,
    /// Fallback total minus actual total, never negative
    pub savings: f64,
    /// Band with the smallest `min_quantity` above the requested quantity
    pub next_tier: Option<T>,
    /// Savings reported for a purchase of exactly `next_tier.min_quantity`
    pub next_tier_savings: Option<f64>,
    pub units_to_next_tier: i64,
}

/// Resolve with [`MatchRule::Threshold`]
pub fn resolve<T: TierBand + Clone>(
    quantity: i64,
    tiers: &[T],
    fallback_unit_price: f64,
    fallback_discounted_unit_price: Option<f64>,
) -> Result<PricingResult<T>, PricingError> {
    resolve_with(
        MatchRule::Threshold,
        quantity,
        tiers,
        fallback_unit_price,
        fallback_discounted_unit_price,
    )
}

pub fn resolve_with<T: TierBand + Clone>(
    rule: MatchRule,
    quantity: i64,
    tiers: &[T],
    fallback_unit_price: f64,
    fallback_discounted_unit_price: Option<f64>,
) -> Result<PricingResult<T>, PricingError> {
    if quantity <= 0 {
        return Err(PricingError::InvalidQuantity(quantity));
    }

    let mut sorted: Vec<&T> = tiers.iter().collect();
    sorted.sort_by_key(|t| t.min_quantity());

    let fallback = money(
        fallback_discounted_unit_price.unwrap_or(fallback_unit_price),
        quantity,
    )?;
    let quote = Quote::at(rule, quantity, &sorted, fallback)?;

    let next_tier = sorted
        .iter()
        .find(|t| t.min_quantity() > quantity)
        .copied();
    let next_tier_savings = match next_tier {
        Some(next) => {
            let at_next = Quote::at(rule, next.min_quantity(), &sorted, fallback)?;
            Some(to_f64(at_next.savings))
        }
        None => None,
    };
    let units_to_next_tier = next_tier.map_or(0, |next| next.min_quantity() - quantity);

    Ok(PricingResult {
        unit_price: to_f64(quote.unit_price),
        total_price: to_f64(quote.total),
        applied_tier: quote.tier.cloned(),
        savings: to_f64(quote.savings),
        next_tier: next_tier.cloned(),
        next_tier_savings,
        units_to_next_tier,
    })
}

struct Quote<'a, T> {
    tier: Option<&'a T>,
    unit_price: Decimal,
    total: Decimal,
    savings: Decimal,
}

impl<'a, T: TierBand> Quote<'a, T> {
    fn at(
        rule: MatchRule,
        quantity: i64,
        sorted: &[&'a T],
        fallback: Decimal,
    ) -> Result<Self, PricingError> {
        let fallback_total = line_total(fallback, quantity)?;

        let quote = match match_tier(rule, quantity, sorted) {
            Some(tier) => {
                let unit_price = money(tier.effective_unit_price(), quantity)?;
                let total = line_total(unit_price, quantity)?;
                Self {
                    tier: Some(tier),
                    unit_price,
                    total,
                    savings: (fallback_total - total).max(Decimal::ZERO),
                }
            }
            None => Self {
                tier: None,
                unit_price: fallback,
                total: fallback_total,
                savings: Decimal::ZERO,
            },
        };
        Ok(quote)
    }
}

/// Rounded unit price, or `Overflow` when `Decimal` cannot represent it
fn money(price: f64, quantity: i64) -> Result<Decimal, PricingError> {
    to_decimal(price)
        .map(round_money)
        .ok_or(PricingError::Overflow { quantity })
}

fn line_total(unit_price: Decimal, quantity: i64) -> Result<Decimal, PricingError> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .map(round_money)
        .ok_or(PricingError::Overflow { quantity })
}

fn match_tier<'a, T: TierBand>(rule: MatchRule, quantity: i64, sorted: &[&'a T]) -> Option<&'a T> {
    match rule {
        MatchRule::Threshold => sorted
            .iter()
            .rev()
            .find(|t| t.min_quantity() <= quantity)
            .copied(),
        MatchRule::RangeInclusive => sorted
            .iter()
            .filter(|t| t.min_quantity() <= quantity && quantity <= t.upper_bound())
            .min_by(|a, b| {
                a.effective_unit_price()
                    .total_cmp(&b.effective_unit_price())
            })
            .copied(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceTierInput;

    fn tier(min: i64, max: Option<i64>, price: f64) -> PriceTierInput {
        PriceTierInput::new(min, max, price)
    }

    fn bulk_tiers() -> Vec<PriceTierInput> {
        vec![
            tier(1, Some(10), 100.0),
            tier(11, Some(50), 90.0),
            tier(51, None, 80.0),
        ]
    }

    #[test]
    fn test_first_band_matches_fallback() {
        let result = resolve(5, &bulk_tiers(), 100.0, None).unwrap();
        assert_eq!(result.unit_price, 100.0);
        assert_eq!(result.total_price, 500.0);
        assert_eq!(result.applied_tier.unwrap().min_quantity, 1);
        assert_eq!(result.savings, 0.0);
        assert_eq!(result.next_tier.unwrap().min_quantity, 11);
        assert_eq!(result.units_to_next_tier, 6);
        assert_eq!(result.next_tier_savings, Some(110.0));
    }

    #[test]
    fn test_second_band_savings() {
        let result = resolve(11, &bulk_tiers(), 100.0, None).unwrap();
        assert_eq!(result.unit_price, 90.0);
        assert_eq!(result.total_price, 990.0);
        assert_eq!(result.savings, 110.0);
        assert_eq!(result.next_tier.unwrap().min_quantity, 51);
        assert_eq!(result.units_to_next_tier, 40);
        assert_eq!(result.next_tier_savings, Some(1020.0));
    }

    #[test]
    fn test_unbounded_band_has_no_next_tier() {
        let result = resolve(100, &bulk_tiers(), 100.0, None).unwrap();
        assert_eq!(result.unit_price, 80.0);
        assert_eq!(result.savings, 2000.0);
        assert!(result.next_tier.is_none());
        assert!(result.next_tier_savings.is_none());
        assert_eq!(result.units_to_next_tier, 0);
    }

    #[test]
    fn test_discounted_tier_applies() {
        let tiers = vec![tier(1, Some(10), 50.0).with_discount(40.0)];
        let result = resolve(5, &tiers, 60.0, None).unwrap();
        assert_eq!(result.unit_price, 40.0);
        assert_eq!(result.total_price, 200.0);
        assert_eq!(result.savings, 100.0);
    }

    #[test]
    fn test_fallback_discount_is_the_baseline() {
        let tiers = vec![tier(1, None, 8.0)];
        let result = resolve(10, &tiers, 12.0, Some(9.0)).unwrap();
        assert_eq!(result.savings, 10.0);
    }

    #[test]
    fn test_empty_tiers_use_fallback() {
        let result = resolve::<PriceTierInput>(3, &[], 12.5, Some(10.0)).unwrap();
        assert_eq!(result.unit_price, 10.0);
        assert_eq!(result.total_price, 30.0);
        assert_eq!(result.savings, 0.0);
        assert!(result.applied_tier.is_none());
        assert!(result.next_tier.is_none());
    }

    #[test]
    fn test_below_lowest_band_uses_fallback() {
        let tiers = vec![tier(10, None, 5.0)];
        let result = resolve(4, &tiers, 7.0, None).unwrap();
        assert_eq!(result.unit_price, 7.0);
        assert!(result.applied_tier.is_none());
        assert_eq!(result.savings, 0.0);
        assert_eq!(result.units_to_next_tier, 6);
        assert_eq!(result.next_tier_savings, Some(20.0));
    }

    #[test]
    fn test_zero_fallback_never_negative() {
        let result = resolve(5, &bulk_tiers(), 0.0, None).unwrap();
        assert_eq!(result.unit_price, 100.0);
        assert_eq!(result.savings, 0.0);

        let result = resolve::<PriceTierInput>(5, &[], 0.0, None).unwrap();
        assert_eq!(result.total_price, 0.0);
        assert_eq!(result.savings, 0.0);
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        assert_eq!(
            resolve(0, &bulk_tiers(), 100.0, None).unwrap_err(),
            PricingError::InvalidQuantity(0)
        );
        assert!(resolve(-3, &bulk_tiers(), 100.0, None).is_err());

        let err: AppError = PricingError::InvalidQuantity(0).into();
        assert_eq!(err.code, ErrorCode::InvalidQuantity);
    }

    #[test]
    fn test_huge_total_is_an_error_not_a_panic() {
        let tiers = vec![tier(1, None, 1e11)];
        let err = resolve(i64::MAX, &tiers, 1e11, None).unwrap_err();
        assert_eq!(err, PricingError::Overflow { quantity: i64::MAX });

        let err: AppError = err.into();
        assert_eq!(err.code, ErrorCode::PriceOutOfRange);
        assert!(err.http_status().is_client_error());
    }

    #[test]
    fn test_unrepresentable_price_is_not_priced_as_zero() {
        let err = resolve::<PriceTierInput>(5, &[], 1e30, None).unwrap_err();
        assert_eq!(err, PricingError::Overflow { quantity: 5 });

        let tiers = vec![tier(1, None, 1e30)];
        assert!(resolve(5, &tiers, 10.0, None).is_err());
        assert!(resolve(5, &[tier(1, None, f64::INFINITY)], 10.0, None).is_err());
    }

    #[test]
    fn test_unsorted_input() {
        let mut tiers = bulk_tiers();
        tiers.reverse();
        let result = resolve(20, &tiers, 100.0, None).unwrap();
        assert_eq!(result.unit_price, 90.0);
    }

    #[test]
    fn test_monotonic_for_bulk_discount() {
        let tiers = bulk_tiers();
        let mut last = f64::INFINITY;
        for quantity in 1..=120 {
            let unit = resolve(quantity, &tiers, 100.0, None).unwrap().unit_price;
            assert!(unit <= last, "unit price rose at quantity {quantity}");
            last = unit;
        }
    }

    #[test]
    fn test_money_rounding() {
        let tiers = vec![tier(1, None, 0.335)];
        let result = resolve(3, &tiers, 1.0, None).unwrap();
        assert_eq!(result.unit_price, 0.34);
        assert_eq!(result.total_price, 1.02);
    }

    #[test]
    fn test_threshold_ignores_upper_bound() {
        // Quantity 15 sits in a gap; threshold keeps the 1-10 band
        let tiers = vec![tier(1, Some(10), 10.0), tier(20, None, 8.0)];
        let threshold = resolve(15, &tiers, 12.0, None).unwrap();
        assert_eq!(threshold.unit_price, 10.0);

        let ranged = resolve_with(MatchRule::RangeInclusive, 15, &tiers, 12.0, None).unwrap();
        assert!(ranged.applied_tier.is_none());
        assert_eq!(ranged.unit_price, 12.0);
    }

    #[test]
    fn test_range_inclusive_picks_best_value() {
        let tiers = vec![tier(1, Some(20), 10.0), tier(5, Some(10), 9.0)];
        let result = resolve_with(MatchRule::RangeInclusive, 7, &tiers, 12.0, None).unwrap();
        assert_eq!(result.unit_price, 9.0);
    }
}
