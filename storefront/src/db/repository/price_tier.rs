//! Price Tier Repository
//!
//! `replace_for_product` is the only write path for tier rows. The
//! `price_tier_guard_*` triggers stay armed for every other writer.

use super::{RepoError, RepoResult};
use shared::models::{PriceTier, PriceTierInput};
use shared::pricing::{TierPolicy, validate};
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};

const SELECT_COLUMNS: &str = "SELECT id, product_id, min_quantity, max_quantity, unit_price, discounted_unit_price, created_at FROM price_tier";

pub async fn find_by_product(pool: &SqlitePool, product_id: i64) -> RepoResult<Vec<PriceTier>> {
    let rows = sqlx::query_as::<_, PriceTier>(&format!(
        "{SELECT_COLUMNS} WHERE product_id = ? ORDER BY min_quantity, id"
    ))
    .bind(product_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn count_by_product(pool: &SqlitePool, product_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM price_tier WHERE product_id = ?")
        .bind(product_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

async fn find_in_tx(conn: &mut SqliteConnection, product_id: i64) -> RepoResult<Vec<PriceTier>> {
    let rows = sqlx::query_as::<_, PriceTier>(&format!(
        "{SELECT_COLUMNS} WHERE product_id = ? ORDER BY min_quantity, id"
    ))
    .bind(product_id)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

/// Swap a product's whole tier set in one transaction.
///
/// The input is validated before anything is touched. Inside the transaction
/// the guards are suspended for this product, old rows are deleted, new rows
/// inserted, the guards re-armed, and the stored set validated again before
/// commit. Any error drops the transaction, which rolls back the rows and the
/// suspension together.
///
/// The transaction is `IMMEDIATE`: concurrent replaces for one product wait
/// for each other and the last one to commit wins.
pub async fn replace_for_product(
    pool: &SqlitePool,
    product_id: i64,
    new_tiers: &[PriceTierInput],
    policy: TierPolicy,
) -> RepoResult<Vec<PriceTier>> {
    if new_tiers.is_empty() {
        return Err(RepoError::EmptyInput);
    }

    let errors = validate(new_tiers, policy);
    if !errors.is_empty() {
        tracing::warn!(product_id, violations = errors.len(), "Tier set rejected before write");
        return Err(RepoError::TierRejected(errors));
    }

    // Take the write lock up front so concurrent replaces queue on busy_timeout
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;

    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM product WHERE id = ?")
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(RepoError::NotFound(format!("Product {product_id}")));
    }

    suspend_guard(&mut tx, product_id).await?;

    let old = find_in_tx(&mut *tx, product_id).await?;
    let diff = TierDiff::between(&old, new_tiers);

    sqlx::query("DELETE FROM price_tier WHERE product_id = ?")
        .bind(product_id)
        .execute(&mut *tx)
        .await?;

    let now = shared::util::now_millis();
    let mut inserted = Vec::with_capacity(new_tiers.len());
    for tier in new_tiers {
        let row = sqlx::query_as::<_, PriceTier>(
            "INSERT INTO price_tier (product_id, min_quantity, max_quantity, unit_price, discounted_unit_price, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING id, product_id, min_quantity, max_quantity, unit_price, discounted_unit_price, created_at",
        )
        .bind(product_id)
        .bind(tier.min_quantity)
        .bind(tier.max_quantity)
        .bind(tier.unit_price)
        .bind(tier.discounted_unit_price)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;
        inserted.push(row);
    }

    resume_guard(&mut tx, product_id).await?;

    let stored = find_in_tx(&mut *tx, product_id).await?;
    let errors = validate(&stored, policy);
    if !errors.is_empty() {
        tracing::warn!(product_id, violations = errors.len(), "Stored tier set failed validation, rolling back");
        return Err(RepoError::TierRejected(errors));
    }

    tx.commit().await?;

    inserted.sort_by_key(|t| t.min_quantity);
    tracing::info!(
        product_id,
        kept = diff.kept,
        added = diff.added.len(),
        removed = diff.removed.len(),
        "Price tiers replaced"
    );
    Ok(inserted)
}

/// Delete every tier of a product inside the caller's transaction.
///
/// The delete guard refuses to drop the last tier of a tiered product, so the
/// caller must clear `has_tiered_pricing` first.
pub async fn delete_for_product(
    tx: &mut Transaction<'_, Sqlite>,
    product_id: i64,
) -> RepoResult<u64> {
    let result = sqlx::query("DELETE FROM price_tier WHERE product_id = ?")
        .bind(product_id)
        .execute(&mut **tx)
        .await?;
    Ok(result.rows_affected())
}

async fn suspend_guard(tx: &mut Transaction<'_, Sqlite>, product_id: i64) -> RepoResult<()> {
    sqlx::query("INSERT INTO tier_guard_suspension (product_id) VALUES (?)")
        .bind(product_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

async fn resume_guard(tx: &mut Transaction<'_, Sqlite>, product_id: i64) -> RepoResult<()> {
    sqlx::query("DELETE FROM tier_guard_suspension WHERE product_id = ?")
        .bind(product_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Band-level difference between the stored set and a replacement, for logs
#[derive(Debug, Default, PartialEq)]
pub(crate) struct TierDiff {
    pub kept: usize,
    pub added: Vec<PriceTierInput>,
    pub removed: Vec<PriceTierInput>,
}

impl TierDiff {
    pub(crate) fn between(old: &[PriceTier], new: &[PriceTierInput]) -> Self {
        let old: Vec<PriceTierInput> = old.iter().map(PriceTierInput::from).collect();
        let mut diff = TierDiff::default();
        for tier in new {
            if old.contains(tier) {
                diff.kept += 1;
            } else {
                diff.added.push(tier.clone());
            }
        }
        diff.removed = old.into_iter().filter(|t| !new.contains(t)).collect();
        diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(id: i64, min: i64, max: Option<i64>, price: f64) -> PriceTier {
        PriceTier {
            id,
            product_id: 1,
            min_quantity: min,
            max_quantity: max,
            unit_price: price,
            discounted_unit_price: None,
            created_at: 0,
        }
    }

    #[test]
    fn test_tier_diff() {
        let old = vec![stored(1, 1, Some(10), 100.0), stored(2, 11, None, 90.0)];
        let new = vec![
            PriceTierInput::new(1, Some(10), 100.0),
            PriceTierInput::new(11, Some(50), 90.0),
            PriceTierInput::new(51, None, 80.0),
        ];

        let diff = TierDiff::between(&old, &new);
        assert_eq!(diff.kept, 1);
        assert_eq!(diff.added.len(), 2);
        assert_eq!(diff.removed, vec![PriceTierInput::new(11, None, 90.0)]);
    }

    #[test]
    fn test_tier_diff_identical() {
        let old = vec![stored(1, 1, None, 5.0)];
        let new = vec![PriceTierInput::new(1, None, 5.0)];
        let diff = TierDiff::between(&old, &new);
        assert_eq!(diff.kept, 1);
        assert!(diff.added.is_empty());
        assert!(diff.removed.is_empty());
    }
}
