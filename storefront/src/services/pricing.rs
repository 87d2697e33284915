//! Pricing Service - tier sets, quotes and pricing mode changes
//!
//! Every storage call runs under the configured store timeout; expiry is
//! reported as [`RepoError::Timeout`], never as a rule violation.

use std::future::Future;
use std::time::Duration;

use shared::models::{PriceTier, PriceTierInput, PricingMode, Product};
use shared::pricing::{
    ModeChangeDecision, ModeTransition, PricingModeCoordinator, PricingResult, TierPolicy,
    TierValidationError, resolve, validate,
};
use sqlx::SqlitePool;

use crate::db::repository::{RepoError, RepoResult, price_tier, product};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Clone)]
pub struct PricingService {
    pool: SqlitePool,
    policy: TierPolicy,
    store_timeout: Duration,
}

impl PricingService {
    pub fn new(pool: SqlitePool, policy: TierPolicy, store_timeout: Duration) -> Self {
        Self {
            pool,
            policy,
            store_timeout,
        }
    }

    pub fn policy(&self) -> TierPolicy {
        self.policy
    }

    async fn bounded<T>(&self, fut: impl Future<Output = RepoResult<T>>) -> RepoResult<T> {
        tokio::time::timeout(self.store_timeout, fut)
            .await
            .map_err(|_| RepoError::Timeout)?
    }

    pub async fn get_product(&self, product_id: i64) -> AppResult<Product> {
        self.bounded(product::find_by_id(&self.pool, product_id))
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::ProductNotFound,
                    format!("Product {product_id} not found"),
                )
            })
    }

    pub async fn get_tiers(&self, product_id: i64) -> AppResult<Vec<PriceTier>> {
        self.get_product(product_id).await?;
        Ok(self
            .bounded(price_tier::find_by_product(&self.pool, product_id))
            .await?)
    }

    /// Advisory check with the same rules the store enforces on save
    pub fn validate_tiers(&self, tiers: &[PriceTierInput]) -> Vec<TierValidationError> {
        validate(tiers, self.policy)
    }

    /// Replace a tiered product's tier set
    pub async fn save_tiers(
        &self,
        product_id: i64,
        tiers: &[PriceTierInput],
    ) -> AppResult<Vec<PriceTier>> {
        let product = self.get_product(product_id).await?;
        if product.pricing_mode() != PricingMode::Tiered {
            return Err(AppError::with_message(
                ErrorCode::PricingModeMismatch,
                format!("Product {product_id} uses simple pricing; switch to tiered pricing first"),
            ));
        }

        let saved = self
            .bounded(price_tier::replace_for_product(
                &self.pool,
                product_id,
                tiers,
                self.policy,
            ))
            .await?;
        Ok(saved)
    }

    /// Price `quantity` units of a product.
    ///
    /// Simple-mode products always resolve to their own price.
    pub async fn quote(&self, product_id: i64, quantity: i64) -> AppResult<PricingResult> {
        let product = self.get_product(product_id).await?;
        let tiers = match product.pricing_mode() {
            PricingMode::Tiered => {
                self.bounded(price_tier::find_by_product(&self.pool, product_id))
                    .await?
            }
            PricingMode::Simple => Vec::new(),
        };

        Ok(resolve(
            quantity,
            &tiers,
            product.price,
            product.discounted_price,
        )?)
    }

    /// Switch a product's pricing mode.
    ///
    /// When the switch would discard data and `confirmed` is false nothing
    /// changes and `PricingModeConfirmationRequired` is returned, listing what
    /// would be lost.
    pub async fn change_mode(
        &self,
        product_id: i64,
        target: PricingMode,
        confirmed: bool,
    ) -> AppResult<Product> {
        let product = self.get_product(product_id).await?;
        let tier_count = self
            .bounded(price_tier::count_by_product(&self.pool, product_id))
            .await?;

        let mut coordinator = PricingModeCoordinator::new(product.pricing_mode());
        let decision =
            coordinator.request_mode_change(target, product.has_simple_data(), tier_count > 0);

        let transition = match decision {
            ModeChangeDecision::Unchanged => return Ok(product),
            ModeChangeDecision::Apply(transition) => transition,
            ModeChangeDecision::RequiresConfirmation(token) if confirmed => {
                coordinator.confirm(token)?
            }
            ModeChangeDecision::RequiresConfirmation(token) => {
                let discards = token.discards();
                coordinator.cancel(token);
                return Err(AppError::new(ErrorCode::PricingModeConfirmationRequired)
                    .with_detail("from", product.pricing_mode().name())
                    .with_detail("to", target.name())
                    .with_detail(
                        "discards",
                        serde_json::to_value(discards).unwrap_or_default(),
                    ));
            }
        };

        self.apply_mode_transition(product_id, transition).await?;
        self.get_product(product_id).await
    }

    /// Persist an approved transition and clear the abandoned mode's data
    pub async fn apply_mode_transition(
        &self,
        product_id: i64,
        transition: ModeTransition,
    ) -> AppResult<()> {
        self.bounded(teardown(&self.pool, product_id, transition))
            .await?;
        tracing::info!(
            product_id,
            from = %transition.from,
            to = %transition.to,
            discards = ?transition.discards,
            "Pricing mode changed"
        );
        Ok(())
    }
}

async fn teardown(pool: &SqlitePool, product_id: i64, transition: ModeTransition) -> RepoResult<()> {
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;

    // Flag first: the delete guard protects the last tier of a tiered product
    product::set_pricing_mode(&mut tx, product_id, transition.to).await?;
    match transition.to {
        PricingMode::Tiered => product::clear_simple_price(&mut tx, product_id).await?,
        PricingMode::Simple => {
            price_tier::delete_for_product(&mut tx, product_id).await?;
        }
    }

    tx.commit().await?;
    Ok(())
}
