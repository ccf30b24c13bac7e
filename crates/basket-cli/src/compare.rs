//! `compare` and `breakdown` commands.

use std::time::Duration;

use basket_core::{AppConfig, Basket, FetchedSource, TotalsMode};
use basket_engine::{
    global_cheapest_store_fetched, per_store_breakdown_fetched, CompareOptions, SourceBreakdown,
};

/// Loads every configured retailer and fetches them concurrently.
async fn fetch_sources(config: &AppConfig) -> anyhow::Result<Vec<FetchedSource>> {
    let retailers = basket_core::load_retailers(&config.retailers_path)?;
    let sources = basket_catalog::build_sources(&retailers);
    let timeout = Duration::from_secs(config.source_timeout_secs);
    Ok(basket_catalog::fetch_concurrently(&sources, timeout).await)
}

pub(crate) async fn run_compare(
    config: &AppConfig,
    items: &[String],
    mode: TotalsMode,
    json: bool,
) -> anyhow::Result<()> {
    let basket = Basket::new(items)?;
    let fetched = fetch_sources(config).await?;
    let result = global_cheapest_store_fetched(fetched, &basket, CompareOptions { mode })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{:<20}{:<16}{:>10}", "ITEM", "STORE", "PRICE");
    for (name, matched) in &result.cheapest_products {
        match matched {
            Some(entry) => println!("{:<20}{:<16}{:>10}", name, entry.store, entry.price),
            None => println!("{:<20}{:<16}{:>10}", name, "-", "-"),
        }
    }

    println!();
    println!("totals ({}):", result.mode);
    for (store, total) in &result.total_costs {
        println!("  {store:<16}{total:>10}");
    }
    println!();
    println!(
        "cheapest store: {} at {}",
        result.cheapest_store, result.cheapest_price
    );

    for warning in &result.warnings {
        eprintln!("warning: {warning}");
    }

    Ok(())
}

pub(crate) async fn run_breakdown(
    config: &AppConfig,
    items: &[String],
    json: bool,
) -> anyhow::Result<()> {
    let basket = Basket::new(items)?;
    let fetched = fetch_sources(config).await?;
    let breakdown = per_store_breakdown_fetched(fetched, &basket);

    if json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
        return Ok(());
    }

    for (label, slot) in &breakdown.sources {
        println!("{label}");
        match slot {
            SourceBreakdown::Failed { error } => println!("  failed: {error}"),
            SourceBreakdown::Baskets(stores) if stores.is_empty() => {
                println!("  no basket items listed");
            }
            SourceBreakdown::Baskets(stores) => {
                for (store, store_items) in stores {
                    println!("  {store}");
                    for item in store_items {
                        println!("    {:<20}{:>10}", item.name, item.price);
                    }
                }
            }
        }
    }

    Ok(())
}
