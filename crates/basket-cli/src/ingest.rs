//! `ingest` command: promotion or receipt text into catalog JSON or the
//! `products` table.

use std::path::Path;

use anyhow::Context;
use basket_catalog::keywords::effective_keywords;
use basket_catalog::{parse_promotion_text, write_records_json};
use sqlx::SqlitePool;

/// Where parsed records end up.
pub(crate) enum IngestTarget<'a> {
    /// Print the records as JSON and store nothing.
    DryRun,
    File(&'a Path),
    /// Append to the `products` table, replacing the store's rows first when
    /// `replace_store` is set.
    Database {
        pool: &'a SqlitePool,
        replace_store: bool,
    },
}

pub(crate) async fn run_ingest(
    input: &Path,
    store: Option<&str>,
    keywords: &[String],
    target: IngestTarget<'_>,
) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let keywords = effective_keywords(keywords);
    let records = parse_promotion_text(&text, store, &keywords);

    if records.is_empty() {
        println!("no priced products found in {}", input.display());
        println!("hint: pass --keyword to match products outside the default list");
        return Ok(());
    }

    match target {
        IngestTarget::DryRun => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        IngestTarget::File(output) => {
            write_records_json(output, &records)?;
            println!("wrote {} record(s) to {}", records.len(), output.display());
        }
        IngestTarget::Database {
            pool,
            replace_store,
        } => {
            if replace_store {
                let store = store.context("--replace needs --store")?;
                let removed = basket_db::delete_store_products(pool, store).await?;
                println!("removed {removed} existing {store} product(s)");
            }
            let inserted = basket_db::insert_products(pool, &records).await?;
            println!("stored {inserted} product(s) in the database");
        }
    }

    tracing::info!(
        input = %input.display(),
        records = records.len(),
        "ingest complete"
    );
    Ok(())
}
