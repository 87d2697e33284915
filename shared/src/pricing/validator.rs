//! Tier set validation
//!
//! [`validate`] is the single rule set used both for immediate feedback while
//! a seller edits tiers and by the store before it commits a replace. Errors
//! reference tiers by their position after sorting by `min_quantity`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{TierBand, TierPolicy};
use crate::error::{AppError, ErrorCode};

/// Which rule a tier set breaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierErrorKind {
    Overlap,
    Gap,
    InvalidMin,
    InvalidMax,
    InvalidPrice,
    InvalidDiscount,
    EmptySet,
}

impl TierErrorKind {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Overlap => ErrorCode::PriceTierOverlap,
            Self::Gap => ErrorCode::PriceTierGap,
            Self::InvalidMin => ErrorCode::PriceTierInvalidMin,
            Self::InvalidMax => ErrorCode::PriceTierInvalidMax,
            Self::InvalidPrice => ErrorCode::PriceTierInvalidPrice,
            Self::InvalidDiscount => ErrorCode::PriceTierInvalidDiscount,
            Self::EmptySet => ErrorCode::PriceTierEmptySet,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Overlap => "overlap",
            Self::Gap => "gap",
            Self::InvalidMin => "invalid_min",
            Self::InvalidMax => "invalid_max",
            Self::InvalidPrice => "invalid_price",
            Self::InvalidDiscount => "invalid_discount",
            Self::EmptySet => "empty_set",
        }
    }
}

/// One violated rule with the tiers it implicates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierValidationError {
    pub kind: TierErrorKind,
    pub message: String,
    /// Positions in `min_quantity` order
    pub tier_indices: Vec<usize>,
}

impl TierValidationError {
    fn new(kind: TierErrorKind, message: impl Into<String>, tier_indices: Vec<usize>) -> Self {
        Self {
            kind,
            message: message.into(),
            tier_indices,
        }
    }

    /// Whether the tier at `index` (sorted order) should be highlighted
    pub fn implicates(&self, index: usize) -> bool {
        self.tier_indices.contains(&index)
    }
}

impl fmt::Display for TierValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.name(), self.message)
    }
}

impl std::error::Error for TierValidationError {}

/// Collapse a list of violations into one API error.
///
/// The code comes from the first violation; every violation is kept under
/// the `violations` detail so the caller can highlight each offending row.
impl From<Vec<TierValidationError>> for AppError {
    fn from(errors: Vec<TierValidationError>) -> Self {
        let code = errors
            .first()
            .map(|e| e.kind.error_code())
            .unwrap_or(ErrorCode::ValidationFailed);
        let message = errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        let violations = serde_json::to_value(&errors).unwrap_or_default();
        AppError::with_message(code, message).with_detail("violations", violations)
    }
}

/// Stable sort by `min_quantity`
pub fn sort_tiers<T: TierBand + Clone>(tiers: &[T]) -> Vec<T> {
    let mut sorted = tiers.to_vec();
    sorted.sort_by_key(|t| t.min_quantity());
    sorted
}

/// True when [`validate`] reports nothing
pub fn is_valid<T: TierBand>(tiers: &[T], policy: TierPolicy) -> bool {
    validate(tiers, policy).is_empty()
}

/// Check a tier set against every structural rule plus `policy`.
///
/// Input order does not matter. An empty result means the set is valid.
pub fn validate<T: TierBand>(tiers: &[T], policy: TierPolicy) -> Vec<TierValidationError> {
    if tiers.is_empty() {
        return vec![TierValidationError::new(
            TierErrorKind::EmptySet,
            "At least one price tier is required",
            Vec::new(),
        )];
    }

    let mut sorted: Vec<&T> = tiers.iter().collect();
    sorted.sort_by_key(|t| t.min_quantity());

    let mut errors = Vec::new();

    for (i, tier) in sorted.iter().enumerate() {
        check_tier(i, *tier, &mut errors);
    }

    check_unbounded(&sorted, &mut errors);

    if policy.require_start_at_one {
        let first = sorted[0].min_quantity();
        if first > 0 && first != 1 {
            errors.push(TierValidationError::new(
                TierErrorKind::InvalidMin,
                format!("Tier 1: the lowest tier must start at quantity 1 (got {first})"),
                vec![0],
            ));
        }
    }

    check_overlaps(&sorted, &mut errors);

    if policy.require_contiguous {
        check_gaps(&sorted, &mut errors);
    }

    errors
}

fn check_tier<T: TierBand>(i: usize, tier: &T, errors: &mut Vec<TierValidationError>) {
    let n = i + 1;
    let min = tier.min_quantity();

    if min <= 0 {
        errors.push(TierValidationError::new(
            TierErrorKind::InvalidMin,
            format!("Tier {n}: minimum quantity must be at least 1 (got {min})"),
            vec![i],
        ));
    }

    if let Some(max) = tier.max_quantity().filter(|max| *max <= min) {
        errors.push(TierValidationError::new(
            TierErrorKind::InvalidMax,
            format!("Tier {n}: maximum quantity {max} must be greater than minimum {min}"),
            vec![i],
        ));
    }

    let unit = tier.unit_price();
    if !unit.is_finite() || unit <= 0.0 {
        errors.push(TierValidationError::new(
            TierErrorKind::InvalidPrice,
            format!("Tier {n}: unit price must be greater than 0 (got {unit})"),
            vec![i],
        ));
    }

    if let Some(discounted) = tier.discounted_unit_price() {
        if !discounted.is_finite() || discounted <= 0.0 {
            errors.push(TierValidationError::new(
                TierErrorKind::InvalidDiscount,
                format!("Tier {n}: discounted price must be greater than 0 (got {discounted})"),
                vec![i],
            ));
        } else if discounted >= unit {
            errors.push(TierValidationError::new(
                TierErrorKind::InvalidDiscount,
                format!(
                    "Tier {n}: discounted price {discounted} must be lower than unit price {unit}"
                ),
                vec![i],
            ));
        }
    }
}

fn check_unbounded<T: TierBand>(sorted: &[&T], errors: &mut Vec<TierValidationError>) {
    let unbounded: Vec<usize> = sorted
        .iter()
        .enumerate()
        .filter(|(_, t)| t.max_quantity().is_none())
        .map(|(i, _)| i)
        .collect();

    match unbounded.as_slice() {
        [] => {}
        [only] => {
            let min = sorted[*only].min_quantity();
            if sorted.iter().any(|t| t.min_quantity() > min) {
                errors.push(TierValidationError::new(
                    TierErrorKind::InvalidMax,
                    format!(
                        "Tier {}: only the highest tier may have no maximum quantity",
                        only + 1
                    ),
                    vec![*only],
                ));
            }
        }
        many => {
            let names = many
                .iter()
                .map(|i| (i + 1).to_string())
                .collect::<Vec<_>>()
                .join(", ");
            errors.push(TierValidationError::new(
                TierErrorKind::InvalidMax,
                format!("Tiers {names}: only one tier may have no maximum quantity"),
                many.to_vec(),
            ));
        }
    }
}

fn check_overlaps<T: TierBand>(sorted: &[&T], errors: &mut Vec<TierValidationError>) {
    for i in 0..sorted.len() {
        for j in (i + 1)..sorted.len() {
            let (a, b) = (sorted[i], sorted[j]);
            if a.min_quantity() <= b.upper_bound() && b.min_quantity() <= a.upper_bound() {
                errors.push(TierValidationError::new(
                    TierErrorKind::Overlap,
                    format!(
                        "Tiers {} and {} overlap ({} and {})",
                        i + 1,
                        j + 1,
                        describe_range(a),
                        describe_range(b)
                    ),
                    vec![i, j],
                ));
            }
        }
    }
}

/// Contiguous bands satisfy `next.min == prev.max + 1`. Only the uncovered
/// side of that rule (`next.min > prev.max + 1`) is a gap here. Neighbours
/// with `next.min <= prev.max` are reported once, by [`check_overlaps`], so a
/// set breaking either side is still rejected.
fn check_gaps<T: TierBand>(sorted: &[&T], errors: &mut Vec<TierValidationError>) {
    for (i, pair) in sorted.windows(2).enumerate() {
        let (prev, next) = (pair[0], pair[1]);
        let Some(prev_max) = prev.max_quantity() else {
            continue;
        };
        let expected = prev_max.saturating_add(1);
        if next.min_quantity() > expected {
            errors.push(TierValidationError::new(
                TierErrorKind::Gap,
                format!(
                    "Tiers {} and {}: quantities {} to {} are not covered",
                    i + 1,
                    i + 2,
                    expected,
                    next.min_quantity() - 1
                ),
                vec![i, i + 1],
            ));
        }
    }
}

fn describe_range<T: TierBand>(tier: &T) -> String {
    match tier.max_quantity() {
        Some(max) => format!("{}-{}", tier.min_quantity(), max),
        None => format!("{}+", tier.min_quantity()),
    }
}
