//! PricingService against a real SQLite file

mod common;

use std::time::Duration;

use common::{TestDb, bulk_tiers, create_product, test_db, tier};
use shared::models::PricingMode;
use shared::pricing::TierPolicy;
use storefront::services::PricingService;
use storefront::{AppError, ErrorCode};

fn service(t: &TestDb) -> PricingService {
    PricingService::new(t.db.pool.clone(), TierPolicy::relaxed(), Duration::from_secs(5))
}

fn assert_code<T: std::fmt::Debug>(result: Result<T, AppError>, code: ErrorCode) -> AppError {
    let err = result.unwrap_err();
    assert_eq!(err.code, code, "unexpected error: {err:?}");
    err
}

async fn tiered_product_with_bulk_tiers(t: &TestDb) -> (PricingService, i64) {
    let svc = service(t);
    let p = create_product(&t.db, 100.0, None, PricingMode::Tiered).await;
    svc.save_tiers(p.id, &bulk_tiers()).await.unwrap();
    (svc, p.id)
}

#[tokio::test]
async fn test_quote_inside_middle_tier() {
    let t = test_db().await;
    let (svc, id) = tiered_product_with_bulk_tiers(&t).await;

    let quote = svc.quote(id, 25).await.unwrap();
    assert_eq!(quote.unit_price, 90.0);
    assert_eq!(quote.total_price, 2250.0);
    assert_eq!(quote.savings, 250.0);
    assert_eq!(quote.applied_tier.as_ref().map(|t| t.min_quantity), Some(11));
    assert_eq!(quote.next_tier.as_ref().map(|t| t.min_quantity), Some(51));
    assert_eq!(quote.units_to_next_tier, 26);
    assert_eq!(quote.next_tier_savings, Some(1020.0));
}

#[tokio::test]
async fn test_quote_first_and_last_tier() {
    let t = test_db().await;
    let (svc, id) = tiered_product_with_bulk_tiers(&t).await;

    let small = svc.quote(id, 5).await.unwrap();
    assert_eq!(small.unit_price, 100.0);
    assert_eq!(small.total_price, 500.0);
    assert_eq!(small.savings, 0.0);
    assert_eq!(small.units_to_next_tier, 6);
    assert_eq!(small.next_tier_savings, Some(110.0));

    let large = svc.quote(id, 60).await.unwrap();
    assert_eq!(large.unit_price, 80.0);
    assert_eq!(large.total_price, 4800.0);
    assert_eq!(large.savings, 1200.0);
    assert!(large.next_tier.is_none());
    assert_eq!(large.next_tier_savings, None);
    assert_eq!(large.units_to_next_tier, 0);
}

#[tokio::test]
async fn test_quote_rejects_non_positive_quantity() {
    let t = test_db().await;
    let (svc, id) = tiered_product_with_bulk_tiers(&t).await;

    let err = assert_code(svc.quote(id, 0).await, ErrorCode::InvalidQuantity);
    assert!(err.details.unwrap().contains_key("quantity"));
    assert_code(svc.quote(id, -3).await, ErrorCode::InvalidQuantity);
}

#[tokio::test]
async fn test_quote_simple_product_uses_its_own_price() {
    let t = test_db().await;
    let svc = service(&t);
    let p = create_product(&t.db, 12.5, Some(10.0), PricingMode::Simple).await;

    let quote = svc.quote(p.id, 3).await.unwrap();
    assert_eq!(quote.unit_price, 10.0);
    assert_eq!(quote.total_price, 30.0);
    assert_eq!(quote.savings, 0.0);
    assert!(quote.applied_tier.is_none());
    assert!(quote.next_tier.is_none());
}

#[tokio::test]
async fn test_discounted_tier_price_applies() {
    let t = test_db().await;
    let svc = service(&t);
    let p = create_product(&t.db, 0.0, None, PricingMode::Tiered).await;
    let tiers = vec![
        tier(1, Some(9), 20.0),
        tier(10, None, 18.0).with_discount(15.0),
    ];
    svc.save_tiers(p.id, &tiers).await.unwrap();

    let quote = svc.quote(p.id, 10).await.unwrap();
    assert_eq!(quote.unit_price, 15.0);
    assert_eq!(quote.total_price, 150.0);
}

#[tokio::test]
async fn test_unknown_product() {
    let t = test_db().await;
    let svc = service(&t);

    assert_code(svc.get_tiers(99).await, ErrorCode::ProductNotFound);
    assert_code(svc.quote(99, 1).await, ErrorCode::ProductNotFound);
    assert_code(svc.save_tiers(99, &bulk_tiers()).await, ErrorCode::ProductNotFound);
}

#[tokio::test]
async fn test_save_tiers_requires_tiered_mode() {
    let t = test_db().await;
    let svc = service(&t);
    let p = create_product(&t.db, 12.5, None, PricingMode::Simple).await;

    assert_code(svc.save_tiers(p.id, &bulk_tiers()).await, ErrorCode::PricingModeMismatch);
    assert!(svc.get_tiers(p.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_save_tiers_reports_violations() {
    let t = test_db().await;
    let (svc, id) = tiered_product_with_bulk_tiers(&t).await;

    let mut overlapping = bulk_tiers();
    overlapping.push(tier(15, Some(20), 85.0));
    let err = assert_code(svc.save_tiers(id, &overlapping).await, ErrorCode::PriceTierOverlap);
    assert!(err.details.unwrap().contains_key("violations"));

    assert_code(svc.save_tiers(id, &[]).await, ErrorCode::PriceTierEmptySet);
    assert_eq!(svc.get_tiers(id).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_validate_tiers_is_advisory() {
    let t = test_db().await;
    let (svc, id) = tiered_product_with_bulk_tiers(&t).await;

    let errors = svc.validate_tiers(&[tier(1, Some(10), 5.0), tier(5, None, 4.0)]);
    assert_eq!(errors.len(), 1);
    assert!(svc.validate_tiers(&bulk_tiers()).is_empty());
    assert_eq!(svc.get_tiers(id).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_switch_to_simple_needs_confirmation() {
    let t = test_db().await;
    let (svc, id) = tiered_product_with_bulk_tiers(&t).await;

    let err = assert_code(
        svc.change_mode(id, PricingMode::Simple, false).await,
        ErrorCode::PricingModeConfirmationRequired,
    );
    let details = err.details.unwrap();
    assert_eq!(details["discards"], "tiers");
    assert_eq!(details["from"], "tiered");
    assert_eq!(details["to"], "simple");

    let product = svc.get_product(id).await.unwrap();
    assert_eq!(product.pricing_mode(), PricingMode::Tiered);
    assert_eq!(svc.get_tiers(id).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_confirmed_switch_to_simple_clears_tiers() {
    let t = test_db().await;
    let (svc, id) = tiered_product_with_bulk_tiers(&t).await;

    let product = svc.change_mode(id, PricingMode::Simple, true).await.unwrap();
    assert_eq!(product.pricing_mode(), PricingMode::Simple);
    assert!(svc.get_tiers(id).await.unwrap().is_empty());

    let quote = svc.quote(id, 25).await.unwrap();
    assert_eq!(quote.unit_price, 100.0);
    assert!(quote.applied_tier.is_none());
}

#[tokio::test]
async fn test_confirmed_switch_to_tiered_clears_simple_price() {
    let t = test_db().await;
    let svc = service(&t);
    let p = create_product(&t.db, 12.5, Some(10.0), PricingMode::Simple).await;

    let err = assert_code(
        svc.change_mode(p.id, PricingMode::Tiered, false).await,
        ErrorCode::PricingModeConfirmationRequired,
    );
    assert_eq!(err.details.unwrap()["discards"], "simple_price");
    assert_eq!(svc.get_product(p.id).await.unwrap().price, 12.5);

    let product = svc.change_mode(p.id, PricingMode::Tiered, true).await.unwrap();
    assert_eq!(product.pricing_mode(), PricingMode::Tiered);
    assert_eq!(product.price, 0.0);
    assert_eq!(product.discounted_price, None);

    svc.save_tiers(p.id, &bulk_tiers()).await.unwrap();
    assert_eq!(svc.get_tiers(p.id).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_switch_without_data_applies_directly() {
    let t = test_db().await;
    let svc = service(&t);

    let bare = create_product(&t.db, 0.0, None, PricingMode::Simple).await;
    let product = svc.change_mode(bare.id, PricingMode::Tiered, false).await.unwrap();
    assert_eq!(product.pricing_mode(), PricingMode::Tiered);

    // Tiered with no tiers yet
    let product = svc.change_mode(bare.id, PricingMode::Simple, false).await.unwrap();
    assert_eq!(product.pricing_mode(), PricingMode::Simple);
}

#[tokio::test]
async fn test_same_mode_is_a_no_op() {
    let t = test_db().await;
    let (svc, id) = tiered_product_with_bulk_tiers(&t).await;

    let before = svc.get_product(id).await.unwrap();
    let after = svc.change_mode(id, PricingMode::Tiered, false).await.unwrap();
    assert_eq!(before.updated_at, after.updated_at);
    assert_eq!(svc.get_tiers(id).await.unwrap().len(), 3);
}
