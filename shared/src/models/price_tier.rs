//! Price Tier Model

use serde::{Deserialize, Serialize};

use crate::pricing::TierBand;

/// One quantity band of a product's tiered pricing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PriceTier {
    pub id: i64,
    pub product_id: i64,
    /// Inclusive lower bound (>= 1)
    pub min_quantity: i64,
    /// Inclusive upper bound, `None` = unbounded
    pub max_quantity: Option<i64>,
    pub unit_price: f64,
    pub discounted_unit_price: Option<f64>,
    pub created_at: i64,
}

/// Tier payload that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTierInput {
    pub min_quantity: i64,
    #[serde(default)]
    pub max_quantity: Option<i64>,
    pub unit_price: f64,
    #[serde(default)]
    pub discounted_unit_price: Option<f64>,
}

impl PriceTierInput {
    pub fn new(min_quantity: i64, max_quantity: Option<i64>, unit_price: f64) -> Self {
        Self {
            min_quantity,
            max_quantity,
            unit_price,
            discounted_unit_price: None,
        }
    }

    pub fn with_discount(mut self, discounted_unit_price: f64) -> Self {
        self.discounted_unit_price = Some(discounted_unit_price);
        self
    }
}

impl From<&PriceTier> for PriceTierInput {
    fn from(tier: &PriceTier) -> Self {
        Self {
            min_quantity: tier.min_quantity,
            max_quantity: tier.max_quantity,
            unit_price: tier.unit_price,
            discounted_unit_price: tier.discounted_unit_price,
        }
    }
}

impl TierBand for PriceTier {
    fn min_quantity(&self) -> i64 {
        self.min_quantity
    }
    fn max_quantity(&self) -> Option<i64> {
        self.max_quantity
    }
    fn unit_price(&self) -> f64 {
        self.unit_price
    }
    fn discounted_unit_price(&self) -> Option<f64> {
        self.discounted_unit_price
    }
}

impl TierBand for PriceTierInput {
    fn min_quantity(&self) -> i64 {
        self.min_quantity
    }
    fn max_quantity(&self) -> Option<i64> {
        self.max_quantity
    }
    fn unit_price(&self) -> f64 {
        self.unit_price
    }
    fn discounted_unit_price(&self) -> Option<f64> {
        self.discounted_unit_price
    }
}
