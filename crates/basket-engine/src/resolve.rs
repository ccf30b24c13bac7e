//! Cheapest-listing resolution for basket items.
//!
//! Product names match by case-insensitive equality, never by substring. The
//! winner for a name is the first entry, in catalog order, with the strictly
//! lowest price.

use std::collections::{HashMap, HashSet};

use basket_core::{Basket, CatalogEntry};
use indexmap::IndexMap;

use crate::Warning;

/// Catalog entries grouped by lowercased product name.
///
/// Entries keep catalog order inside each group, which is what makes ties
/// deterministic.
#[derive(Debug)]
pub struct CatalogIndex<'a> {
    by_product: HashMap<String, Vec<&'a CatalogEntry>>,
    stores: Vec<&'a str>,
}

impl<'a> CatalogIndex<'a> {
    #[must_use]
    pub fn build(entries: &'a [CatalogEntry]) -> Self {
        let mut by_product: HashMap<String, Vec<&'a CatalogEntry>> = HashMap::new();
        let mut stores = Vec::new();
        let mut seen_stores = HashSet::new();

        for entry in entries {
            by_product.entry(entry.product_key()).or_default().push(entry);
            if seen_stores.insert(entry.store.as_str()) {
                stores.push(entry.store.as_str());
            }
        }

        Self { by_product, stores }
    }

    /// Cheapest entry for `name` across every store.
    #[must_use]
    pub fn cheapest(&self, name: &str) -> Option<&'a CatalogEntry> {
        first_minimum(self.candidates(name))
    }

    /// Cheapest entry for `name` listed by `store`.
    #[must_use]
    pub fn cheapest_at(&self, name: &str, store: &str) -> Option<&'a CatalogEntry> {
        first_minimum(self.candidates(name).filter(|e| e.store == store))
    }

    /// Distinct stores in order of first appearance in the catalog.
    #[must_use]
    pub fn stores(&self) -> &[&'a str] {
        &self.stores
    }

    fn candidates(&self, name: &str) -> impl Iterator<Item = &'a CatalogEntry> + '_ {
        self.by_product
            .get(&name.to_lowercase())
            .into_iter()
            .flat_map(|entries| entries.iter().copied())
    }
}

fn first_minimum<'a>(
    entries: impl Iterator<Item = &'a CatalogEntry>,
) -> Option<&'a CatalogEntry> {
    let mut best: Option<&'a CatalogEntry> = None;
    for entry in entries {
        match best {
            Some(current) if entry.price >= current.price => {}
            _ => best = Some(entry),
        }
    }
    best
}

/// The resolver's answer for one basket line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheapestMatch {
    pub product_name: String,
    pub matched: Option<CatalogEntry>,
}

/// One [`CheapestMatch`] per basket line, in basket order. Duplicate basket
/// names appear once per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    lines: Vec<CheapestMatch>,
}

impl Resolution {
    #[must_use]
    pub fn lines(&self) -> &[CheapestMatch] {
        &self.lines
    }

    /// Basket name → winning entry, one key per distinct name in first-seen
    /// order. Unmatched names map to `None`.
    #[must_use]
    pub fn cheapest_products(&self) -> IndexMap<String, Option<CatalogEntry>> {
        let mut products = IndexMap::new();
        for line in &self.lines {
            products
                .entry(line.product_name.clone())
                .or_insert_with(|| line.matched.clone());
        }
        products
    }

    /// A [`Warning::NoMatch`] for each distinct unmatched name.
    #[must_use]
    pub fn warnings(&self) -> Vec<Warning> {
        let mut seen = HashSet::new();
        self.lines
            .iter()
            .filter(|line| line.matched.is_none())
            .filter(|line| seen.insert(line.product_name.as_str()))
            .map(|line| Warning::NoMatch {
                name: line.product_name.clone(),
            })
            .collect()
    }
}

/// Finds the cheapest entry for every basket line.
#[must_use]
pub fn resolve(catalog: &[CatalogEntry], basket: &Basket) -> Resolution {
    resolve_with_index(&CatalogIndex::build(catalog), basket)
}

/// Like [`resolve`], reusing an index the caller already built.
#[must_use]
pub fn resolve_with_index(index: &CatalogIndex<'_>, basket: &Basket) -> Resolution {
    let mut memo: HashMap<String, Option<CatalogEntry>> = HashMap::new();
    let mut lines = Vec::with_capacity(basket.len());

    for item in basket {
        let matched = memo
            .entry(item.key())
            .or_insert_with(|| {
                let found = index.cheapest(&item.name).cloned();
                if found.is_none() {
                    tracing::warn!(product = %item.name, "no catalog entry matches basket item");
                }
                found
            })
            .clone();

        lines.push(CheapestMatch {
            product_name: item.name.clone(),
            matched,
        });
    }

    Resolution { lines }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::*;

    fn entry(store: &str, product: &str, price: &str) -> CatalogEntry {
        CatalogEntry::new(store, product, Decimal::from_str(price).unwrap())
    }

    fn scenario_catalog() -> Vec<CatalogEntry> {
        vec![
            entry("A", "Milk", "2.00"),
            entry("B", "Milk", "1.50"),
            entry("A", "Bread", "2.00"),
        ]
    }

    #[test]
    fn picks_strictly_cheapest_across_stores() {
        let catalog = scenario_catalog();
        let basket = Basket::new(["Milk", "Bread"]).unwrap();
        let resolution = resolve(&catalog, &basket);

        let products = resolution.cheapest_products();
        let milk = products["Milk"].as_ref().unwrap();
        assert_eq!(milk.store, "B");
        assert_eq!(milk.price, Decimal::from_str("1.50").unwrap());
        let bread = products["Bread"].as_ref().unwrap();
        assert_eq!(bread.store, "A");
    }

    #[test]
    fn matching_is_case_insensitive_equality_not_substring() {
        let catalog = vec![
            entry("A", "Milk Chocolate", "0.50"),
            entry("B", "MILK", "1.10"),
        ];
        let basket = Basket::new(["milk"]).unwrap();
        let resolution = resolve(&catalog, &basket);
        let matched = resolution.lines()[0].matched.as_ref().unwrap();
        assert_eq!(matched.store, "B");
        assert_eq!(matched.product, "MILK");
    }

    #[test]
    fn ties_keep_first_in_catalog_order() {
        let catalog = vec![
            entry("A", "Eggs", "4.00"),
            entry("B", "Eggs", "4.00"),
            entry("C", "Eggs", "4.00"),
        ];
        let basket = Basket::new(["Eggs"]).unwrap();
        let resolution = resolve(&catalog, &basket);
        assert_eq!(resolution.lines()[0].matched.as_ref().unwrap().store, "A");
    }

    #[test]
    fn unmatched_name_is_absent_with_warning() {
        let catalog = scenario_catalog();
        let basket = Basket::new(["Milk", "Caviar", "Caviar"]).unwrap();
        let resolution = resolve(&catalog, &basket);

        assert!(resolution.lines()[1].matched.is_none());
        assert!(resolution.cheapest_products()["Caviar"].is_none());
        assert_eq!(
            resolution.warnings(),
            vec![Warning::NoMatch {
                name: "Caviar".to_string()
            }]
        );
    }

    #[test]
    fn duplicate_names_resolve_to_identical_match() {
        let catalog = scenario_catalog();
        let basket = Basket::new(["Milk", "Milk"]).unwrap();
        let resolution = resolve(&catalog, &basket);

        assert_eq!(resolution.lines().len(), 2);
        assert_eq!(resolution.lines()[0], resolution.lines()[1]);
        assert_eq!(resolution.cheapest_products().len(), 1);
    }

    #[test]
    fn single_store_match_is_trivially_cheapest() {
        let catalog = scenario_catalog();
        let basket = Basket::new(["Bread"]).unwrap();
        let resolution = resolve(&catalog, &basket);
        assert_eq!(resolution.lines()[0].matched.as_ref().unwrap().store, "A");
    }

    #[test]
    fn cheapest_at_restricts_to_store() {
        let catalog = scenario_catalog();
        let index = CatalogIndex::build(&catalog);
        assert_eq!(
            index.cheapest_at("milk", "A").unwrap().price,
            Decimal::from_str("2.00").unwrap()
        );
        assert!(index.cheapest_at("bread", "B").is_none());
    }

    #[test]
    fn stores_follow_first_appearance() {
        let catalog = vec![
            entry("B", "Milk", "1"),
            entry("A", "Milk", "1"),
            entry("B", "Bread", "1"),
        ];
        let index = CatalogIndex::build(&catalog);
        assert_eq!(index.stores(), &["B", "A"]);
    }

    #[test]
    fn empty_catalog_matches_nothing() {
        let basket = Basket::new(["Milk"]).unwrap();
        let resolution = resolve(&[], &basket);
        assert!(resolution.lines()[0].matched.is_none());
    }
}
