//! The two comparison use cases built from the engine stages.

use basket_core::{Basket, CatalogEntry, CatalogSource, FetchedSource, TotalsMode};
use indexmap::IndexMap;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::{
    aggregate, fetch_all, full_basket_totals, group_by_store, load_catalog, load_source,
    pick_cheapest, resolve, resolve_with_index, CatalogIndex, CompareError, StoreItem,
    StoreTotals, Warning,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompareOptions {
    pub mode: TotalsMode,
}

/// Outcome of [`global_cheapest_store`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    /// Basket name → cheapest listing anywhere, `null` when nothing matched.
    pub cheapest_products: IndexMap<String, Option<CatalogEntry>>,
    #[serde(serialize_with = "serialize_totals")]
    pub total_costs: StoreTotals,
    pub cheapest_store: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub cheapest_price: Decimal,
    pub mode: TotalsMode,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

fn serialize_totals<S: Serializer>(totals: &StoreTotals, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(totals.len()))?;
    for (store, total) in totals {
        map.serialize_entry(store, &total.to_f64())?;
    }
    map.end()
}

/// One retailer's slot in a [`PerStoreBreakdown`].
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SourceBreakdown {
    Baskets(IndexMap<String, Vec<StoreItem>>),
    Failed { error: String },
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PerStoreBreakdown {
    #[serde(flatten)]
    pub sources: IndexMap<String, SourceBreakdown>,
    #[serde(skip)]
    pub warnings: Vec<Warning>,
}

/// Groups each source's own cheapest listings by store, one source at a time.
///
/// Sources never compete with each other here. A source that cannot be
/// loaded gets a [`SourceBreakdown::Failed`] slot and the rest carry on.
#[must_use]
pub fn per_store_breakdown(sources: &[&dyn CatalogSource], basket: &Basket) -> PerStoreBreakdown {
    per_store_breakdown_fetched(fetch_all(sources), basket)
}

/// [`per_store_breakdown`] over sources that were already fetched.
#[must_use]
pub fn per_store_breakdown_fetched(fetched: Vec<FetchedSource>, basket: &Basket) -> PerStoreBreakdown {
    let mut breakdown = PerStoreBreakdown::default();

    for source in fetched {
        let label = source.label.clone();
        let slot = match load_source(source) {
            Ok(catalog) => {
                let grouped = group_by_store(&resolve(&catalog.entries, basket));
                breakdown.warnings.extend(catalog.warnings);
                breakdown.warnings.extend(grouped.warnings.iter().cloned());
                SourceBreakdown::Baskets(grouped.into_store_items())
            }
            Err(e) => {
                tracing::warn!(source = %label, error = %e, "breakdown source failed");
                SourceBreakdown::Failed {
                    error: e.to_string(),
                }
            }
        };
        breakdown.sources.insert(label, slot);
    }

    breakdown
}

/// Finds the single cheapest store for the basket across all sources.
///
/// # Errors
///
/// See [`global_cheapest_store_fetched`].
pub fn global_cheapest_store(
    sources: &[&dyn CatalogSource],
    basket: &Basket,
    options: CompareOptions,
) -> Result<ComparisonResult, CompareError> {
    global_cheapest_store_fetched(fetch_all(sources), basket, options)
}

/// [`global_cheapest_store`] over sources that were already fetched.
///
/// Failed sources are excluded and reported as warnings.
///
/// # Errors
///
/// - [`CompareError::EmptyCatalog`] when no source contributed an entry.
/// - [`CompareError::NoValidTotals`] when no store could be totalled.
/// - [`CompareError::PriceOverflow`] when a store total overflows.
pub fn global_cheapest_store_fetched(
    fetched: Vec<FetchedSource>,
    basket: &Basket,
    options: CompareOptions,
) -> Result<ComparisonResult, CompareError> {
    let catalog = load_catalog(fetched);
    if catalog.entries.is_empty() {
        tracing::warn!(warnings = catalog.warnings.len(), "combined catalog is empty");
        return Err(CompareError::EmptyCatalog);
    }

    let index = CatalogIndex::build(&catalog.entries);
    let resolution = resolve_with_index(&index, basket);

    let total_costs = match options.mode {
        TotalsMode::BestEffort => aggregate(&resolution)?,
        TotalsMode::FullBasketOnly => full_basket_totals(&index, basket)?,
    };
    let (cheapest_store, cheapest_price) = pick_cheapest(&total_costs)?;
    let cheapest_store = cheapest_store.to_string();

    tracing::info!(
        mode = %options.mode,
        entries = catalog.entries.len(),
        stores = total_costs.len(),
        cheapest_store = %cheapest_store,
        cheapest_price = %cheapest_price,
        "comparison complete"
    );

    let mut warnings = catalog.warnings;
    warnings.extend(resolution.warnings());

    Ok(ComparisonResult {
        cheapest_products: resolution.cheapest_products(),
        total_costs,
        cheapest_store,
        cheapest_price,
        mode: options.mode,
        warnings,
    })
}

#[cfg(test)]
#[path = "compare_test.rs"]
mod tests;
