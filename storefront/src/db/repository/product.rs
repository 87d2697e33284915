//! Product Repository (pricing fields)

use super::{RepoError, RepoResult};
use shared::models::{PricingMode, Product, ProductCreate};
use sqlx::{Sqlite, SqlitePool, Transaction};

const SELECT_COLUMNS: &str = "SELECT id, name, price, discounted_price, has_tiered_pricing, created_at, updated_at FROM product";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let row = sqlx::query_as::<_, Product>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<Product> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO product (name, price, discounted_price, has_tiered_pricing, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?5) RETURNING id",
    )
    .bind(&data.name)
    .bind(data.price)
    .bind(data.discounted_price)
    .bind(data.pricing_mode.as_flag())
    .bind(now)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM product WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Set `has_tiered_pricing` inside the caller's transaction
pub async fn set_pricing_mode(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    mode: PricingMode,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE product SET has_tiered_pricing = ?, updated_at = ? WHERE id = ?")
        .bind(mode.as_flag())
        .bind(now)
        .bind(id)
        .execute(&mut **tx)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id}")));
    }
    Ok(())
}

/// Reset the simple-mode price fields (price to 0, no discount)
pub async fn clear_simple_price(tx: &mut Transaction<'_, Sqlite>, id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query("UPDATE product SET price = 0, discounted_price = NULL, updated_at = ? WHERE id = ?")
        .bind(now)
        .bind(id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
