//! Service layer
//!
//! - [`PricingService`] - tier sets, quotes and pricing mode changes

pub mod pricing;

pub use pricing::PricingService;
