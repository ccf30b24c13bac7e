use basket_core::CatalogEntry;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{Resolution, Warning};

/// A basket line as priced at one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreItem {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub brand: String,
    pub quantity: String,
}

impl StoreItem {
    fn from_match(name: &str, entry: &CatalogEntry) -> Self {
        Self {
            name: name.to_string(),
            price: entry.price,
            brand: entry.brand.clone(),
            quantity: entry.quantity.clone(),
        }
    }
}

/// The basket lines whose cheapest listing is at `store`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreBasket {
    pub store: String,
    pub items: Vec<StoreItem>,
}

#[derive(Debug, Clone, Default)]
pub struct GroupedBaskets {
    pub baskets: IndexMap<String, StoreBasket>,
    pub warnings: Vec<Warning>,
}

impl GroupedBaskets {
    /// Store → items, the shape used in breakdown output.
    #[must_use]
    pub fn into_store_items(self) -> IndexMap<String, Vec<StoreItem>> {
        self.baskets
            .into_iter()
            .map(|(store, basket)| (store, basket.items))
            .collect()
    }
}

/// Regroups matched basket lines by the store that offered them.
///
/// Store baskets appear in the order their first item appears in the basket,
/// and items keep basket order. Unmatched lines and matches without a store
/// are skipped and reported.
#[must_use]
pub fn group_by_store(resolution: &Resolution) -> GroupedBaskets {
    let mut grouped = GroupedBaskets::default();

    for line in resolution.lines() {
        let Some(entry) = &line.matched else {
            grouped.warnings.push(Warning::UngroupedMatch {
                name: line.product_name.clone(),
                reason: "no matching listing".to_string(),
            });
            continue;
        };

        if entry.store.trim().is_empty() {
            tracing::warn!(product = %line.product_name, "match has no store; not grouped");
            grouped.warnings.push(Warning::UngroupedMatch {
                name: line.product_name.clone(),
                reason: "listing has no store".to_string(),
            });
            continue;
        }

        grouped
            .baskets
            .entry(entry.store.clone())
            .or_insert_with(|| StoreBasket {
                store: entry.store.clone(),
                items: Vec::new(),
            })
            .items
            .push(StoreItem::from_match(&line.product_name, entry));
    }

    grouped
}
