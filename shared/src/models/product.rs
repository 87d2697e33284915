//! Product Model (pricing fields only)

use serde::{Deserialize, Serialize};

/// Which pricing data a product sells with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingMode {
    #[default]
    Simple,
    Tiered,
}

impl PricingMode {
    pub fn from_flag(has_tiered_pricing: bool) -> Self {
        if has_tiered_pricing {
            Self::Tiered
        } else {
            Self::Simple
        }
    }

    /// Value stored in `product.has_tiered_pricing`
    pub fn as_flag(&self) -> bool {
        matches!(self, Self::Tiered)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Tiered => "tiered",
        }
    }
}

impl std::fmt::Display for PricingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Simple-mode unit price, display fallback in tiered mode
    pub price: f64,
    pub discounted_price: Option<f64>,
    pub has_tiered_pricing: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Product {
    pub fn pricing_mode(&self) -> PricingMode {
        PricingMode::from_flag(self.has_tiered_pricing)
    }

    /// Whether the simple-mode fields hold anything worth keeping
    pub fn has_simple_data(&self) -> bool {
        self.price > 0.0 || self.discounted_price.is_some()
    }
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub price: f64,
    pub discounted_price: Option<f64>,
    #[serde(default)]
    pub pricing_mode: PricingMode,
}
