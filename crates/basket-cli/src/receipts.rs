//! `receipts` subcommands.

use basket_db::{DbError, Receipt};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;

fn build_receipt(product: &str, price: Decimal, date: Option<NaiveDate>) -> anyhow::Result<Receipt> {
    let product_name = product.trim();
    if product_name.is_empty() {
        anyhow::bail!("product name must not be empty");
    }
    if price.is_sign_negative() {
        anyhow::bail!("price must be non-negative, got {price}");
    }
    Ok(Receipt {
        product_name: product_name.to_string(),
        price,
        date: date.unwrap_or_else(|| Utc::now().date_naive()),
    })
}

pub(crate) async fn run_list(pool: &SqlitePool) -> anyhow::Result<()> {
    let receipts = basket_db::list_receipts(pool).await?;
    if receipts.is_empty() {
        println!("no receipts stored");
        println!("hint: add one with `basket-cli receipts add <product> <price>`");
        return Ok(());
    }

    println!("{:<28}{:>10}  {:<10}", "PRODUCT", "PRICE", "DATE");
    for receipt in &receipts {
        println!(
            "{:<28}{:>10}  {:<10}",
            receipt.product_name,
            receipt.price,
            receipt.date.format("%Y-%m-%d")
        );
    }
    Ok(())
}

pub(crate) async fn run_add(
    pool: &SqlitePool,
    product: &str,
    price: Decimal,
    date: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let receipt = build_receipt(product, price, date)?;
    basket_db::upsert_receipt(pool, &receipt).await?;
    println!("stored {} at {}", receipt.product_name, receipt.price);
    Ok(())
}

pub(crate) async fn run_update(
    pool: &SqlitePool,
    product: &str,
    price: Decimal,
    date: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let receipt = build_receipt(product, price, date)?;
    match basket_db::update_receipt(pool, &receipt).await {
        Ok(()) => {
            println!("updated {} to {}", receipt.product_name, receipt.price);
            Ok(())
        }
        Err(DbError::NotFound) => {
            anyhow::bail!("no receipt for '{}'; use `receipts add`", receipt.product_name)
        }
        Err(e) => Err(e.into()),
    }
}

pub(crate) async fn run_delete(pool: &SqlitePool, product: &str) -> anyhow::Result<()> {
    let product_name = product.trim();
    match basket_db::delete_receipt(pool, product_name).await {
        Ok(()) => {
            println!("deleted {product_name}");
            Ok(())
        }
        Err(DbError::NotFound) => anyhow::bail!("no receipt for '{product_name}'"),
        Err(e) => Err(e.into()),
    }
}
