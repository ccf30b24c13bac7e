//! Per-store totals and cheapest-store selection.

use basket_core::Basket;
use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::{CatalogIndex, CompareError, Resolution};

/// Store → total price, in the order stores were first credited.
pub type StoreTotals = IndexMap<String, Decimal>;

/// Sums the price of each matched basket line at the store that won it.
///
/// Only lines with a match contribute, so a store's total covers whatever
/// subset of the basket it was cheapest for. Stores with no winning line are
/// absent. Duplicate basket lines count once per line.
///
/// # Errors
///
/// Returns [`CompareError::PriceOverflow`] if a store's total overflows.
pub fn aggregate(resolution: &Resolution) -> Result<StoreTotals, CompareError> {
    let mut totals = StoreTotals::new();

    for entry in resolution.lines().iter().filter_map(|l| l.matched.as_ref()) {
        if entry.store.trim().is_empty() {
            continue;
        }
        let total = totals.entry(entry.store.clone()).or_insert(Decimal::ZERO);
        *total = total
            .checked_add(entry.price)
            .ok_or_else(|| CompareError::PriceOverflow {
                store: entry.store.clone(),
            })?;
    }

    Ok(totals)
}

/// Totals for buying the whole basket at a single store.
///
/// A store is included only if it lists every basket line; its total is the
/// sum of its own cheapest listing per line. Stores appear in catalog order.
///
/// # Errors
///
/// Returns [`CompareError::PriceOverflow`] if a store's total overflows.
pub fn full_basket_totals(
    index: &CatalogIndex<'_>,
    basket: &Basket,
) -> Result<StoreTotals, CompareError> {
    let mut totals = StoreTotals::new();

    'stores: for store in index.stores() {
        if store.trim().is_empty() {
            continue;
        }
        let mut total = Decimal::ZERO;
        for item in basket {
            let Some(entry) = index.cheapest_at(&item.name, store) else {
                tracing::debug!(store, product = %item.name, "store does not cover basket");
                continue 'stores;
            };
            total = total
                .checked_add(entry.price)
                .ok_or_else(|| CompareError::PriceOverflow {
                    store: (*store).to_string(),
                })?;
        }
        totals.insert((*store).to_string(), total);
    }

    Ok(totals)
}

/// Picks the store with the lowest total; ties go to the earliest store.
///
/// # Errors
///
/// Returns [`CompareError::NoValidTotals`] when `totals` is empty.
pub fn pick_cheapest(totals: &StoreTotals) -> Result<(&str, Decimal), CompareError> {
    let mut best: Option<(&str, Decimal)> = None;
    for (store, total) in totals {
        match best {
            Some((_, current)) if *total >= current => {}
            _ => best = Some((store.as_str(), *total)),
        }
    }
    best.ok_or(CompareError::NoValidTotals)
}
