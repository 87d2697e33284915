#![allow(dead_code)]

use shared::models::{PriceTierInput, PricingMode, Product, ProductCreate};
use storefront::db::DbService;
use storefront::db::repository::product;
use tempfile::TempDir;

/// A migrated database in a temp dir; the dir lives as long as this value
pub struct TestDb {
    pub db: DbService,
    pub dir: TempDir,
}

pub async fn test_db() -> TestDb {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storefront.db");
    let db = DbService::new(path.to_str().unwrap()).await.unwrap();
    TestDb { db, dir }
}

pub async fn create_product(
    db: &DbService,
    price: f64,
    discounted_price: Option<f64>,
    pricing_mode: PricingMode,
) -> Product {
    product::create(
        &db.pool,
        ProductCreate {
            name: "Bulk coffee beans".into(),
            price,
            discounted_price,
            pricing_mode,
        },
    )
    .await
    .unwrap()
}

pub fn tier(min: i64, max: Option<i64>, price: f64) -> PriceTierInput {
    PriceTierInput::new(min, max, price)
}

/// 1-10 @ 100, 11-50 @ 90, 51+ @ 80
pub fn bulk_tiers() -> Vec<PriceTierInput> {
    vec![
        tier(1, Some(10), 100.0),
        tier(11, Some(50), 90.0),
        tier(51, None, 80.0),
    ]
}
