//! Database operations for `products`: parsed listings kept as raw records.

use basket_core::{RawCatalogRecord, RawPrice};
use sqlx::SqlitePool;

use crate::DbError;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub store: Option<String>,
    pub product: String,
    pub brand: Option<String>,
    /// Price text as ingested, e.g. `"3.10"`; not validated until read.
    pub price: Option<String>,
    pub quantity: Option<String>,
}

impl From<ProductRow> for RawCatalogRecord {
    fn from(row: ProductRow) -> Self {
        Self {
            store: row.store,
            product: Some(row.product),
            brand: row.brand,
            price: row.price.map(RawPrice::Text),
            quantity: row.quantity,
        }
    }
}

fn price_text(price: &RawPrice) -> String {
    match price {
        RawPrice::Number(n) => n.to_string(),
        RawPrice::Text(t) => t.trim().to_string(),
    }
}

/// Inserts records in one transaction and returns how many were stored.
///
/// Records without a product name are skipped.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any insert fails; nothing is stored then.
pub async fn insert_products(
    pool: &SqlitePool,
    records: &[RawCatalogRecord],
) -> Result<u64, DbError> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0;

    for (position, record) in records.iter().enumerate() {
        let Some(product) = record.product.as_deref().map(str::trim).filter(|p| !p.is_empty())
        else {
            tracing::warn!(position, "skipping product record without a name");
            continue;
        };

        sqlx::query(
            "INSERT INTO products (store, product, brand, price, quantity) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(record.store.as_deref())
        .bind(product)
        .bind(record.brand.as_deref())
        .bind(record.price.as_ref().map(price_text))
        .bind(record.quantity.as_deref())
        .execute(&mut *tx)
        .await?;
        inserted += 1;
    }

    tx.commit().await?;
    tracing::debug!(inserted, skipped = records.len() as u64 - inserted, "products stored");
    Ok(inserted)
}

/// Lists stored products in insertion order, optionally for one store.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on query failure.
pub async fn list_products(
    pool: &SqlitePool,
    store: Option<&str>,
) -> Result<Vec<ProductRow>, DbError> {
    let rows = match store {
        Some(store) => {
            sqlx::query_as::<_, ProductRow>(
                "SELECT id, store, product, brand, price, quantity FROM products \
                 WHERE store = ? ORDER BY id",
            )
            .bind(store)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, ProductRow>(
                "SELECT id, store, product, brand, price, quantity FROM products ORDER BY id",
            )
            .fetch_all(pool)
            .await?
        }
    };
    Ok(rows)
}

/// Removes every stored product for `store` and returns how many went.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_store_products(pool: &SqlitePool, store: &str) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM products WHERE store = ?")
        .bind(store)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
