//! Database operations for `receipts`: one remembered price per product.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::SqlitePool;

use crate::DbError;

/// A row from the `receipts` table as stored.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReceiptRow {
    pub product_name: String,
    /// Decimal string, e.g. `"3.49"`.
    pub price: String,
    pub date: NaiveDate,
}

/// A receipt with its price decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub product_name: String,
    pub price: Decimal,
    pub date: NaiveDate,
}

impl TryFrom<ReceiptRow> for Receipt {
    type Error = DbError;

    fn try_from(row: ReceiptRow) -> Result<Self, Self::Error> {
        let price = Decimal::from_str(&row.price).map_err(|_| DbError::CorruptPrice {
            product_name: row.product_name.clone(),
            raw: row.price.clone(),
        })?;
        Ok(Self {
            product_name: row.product_name,
            price,
            date: row.date,
        })
    }
}

/// Inserts a receipt, replacing any existing row for the same product.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the write fails.
pub async fn upsert_receipt(pool: &SqlitePool, receipt: &Receipt) -> Result<(), DbError> {
    sqlx::query(
        "INSERT OR REPLACE INTO receipts (product_name, price, date, updated_at) \
         VALUES (?, ?, ?, strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))",
    )
    .bind(&receipt.product_name)
    .bind(receipt.price.normalize().to_string())
    .bind(receipt.date)
    .execute(pool)
    .await?;

    tracing::debug!(product = %receipt.product_name, price = %receipt.price, "receipt stored");
    Ok(())
}

/// Updates the price and date of an existing receipt.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no receipt exists for the product, or
/// [`DbError::Sqlx`] if the write fails.
pub async fn update_receipt(pool: &SqlitePool, receipt: &Receipt) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE receipts \
         SET price = ?, date = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now') \
         WHERE product_name = ?",
    )
    .bind(receipt.price.normalize().to_string())
    .bind(receipt.date)
    .bind(&receipt.product_name)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Deletes the receipt for `product_name`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no receipt exists for the product, or
/// [`DbError::Sqlx`] if the delete fails.
pub async fn delete_receipt(pool: &SqlitePool, product_name: &str) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM receipts WHERE product_name = ?")
        .bind(product_name)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Fetches one receipt by product name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on query failure or [`DbError::CorruptPrice`]
/// if the stored price cannot be decoded.
pub async fn get_receipt(
    pool: &SqlitePool,
    product_name: &str,
) -> Result<Option<Receipt>, DbError> {
    let row = sqlx::query_as::<_, ReceiptRow>(
        "SELECT product_name, price, date FROM receipts WHERE product_name = ?",
    )
    .bind(product_name)
    .fetch_optional(pool)
    .await?;

    row.map(Receipt::try_from).transpose()
}

/// Lists every receipt ordered by product name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on query failure or [`DbError::CorruptPrice`]
/// if a stored price cannot be decoded.
pub async fn list_receipts(pool: &SqlitePool) -> Result<Vec<Receipt>, DbError> {
    let rows = sqlx::query_as::<_, ReceiptRow>(
        "SELECT product_name, price, date FROM receipts ORDER BY product_name",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Receipt::try_from).collect()
}
