use std::str::FromStr;

use basket_core::{RawCatalogRecord, RawPrice, SourceError};

use super::*;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn record(store: &str, product: &str, price: &str) -> RawCatalogRecord {
    RawCatalogRecord {
        store: Some(store.to_string()),
        product: Some(product.to_string()),
        price: Some(RawPrice::Text(price.to_string())),
        ..RawCatalogRecord::default()
    }
}

struct ListSource {
    label: &'static str,
    records: Vec<RawCatalogRecord>,
}

impl CatalogSource for ListSource {
    fn label(&self) -> &str {
        self.label
    }

    fn fetch(&self) -> Result<Vec<RawCatalogRecord>, SourceError> {
        Ok(self.records.clone())
    }
}

struct MissingFile;

impl CatalogSource for MissingFile {
    fn label(&self) -> &str {
        "missing"
    }

    fn fetch(&self) -> Result<Vec<RawCatalogRecord>, SourceError> {
        Err(SourceError::Unavailable {
            label: "missing".to_string(),
            reason: "no such file".to_string(),
        })
    }
}

fn scenario_sources() -> (ListSource, ListSource) {
    (
        ListSource {
            label: "a",
            records: vec![record("A", "Milk", "2.00"), record("A", "Bread", "2.00")],
        },
        ListSource {
            label: "b",
            records: vec![record("B", "Milk", "1.50")],
        },
    )
}

#[test]
fn milk_bread_scenario_best_effort() {
    let (a, b) = scenario_sources();
    let basket = Basket::new(["Milk", "Bread"]).unwrap();
    let result = global_cheapest_store(&[&a, &b], &basket, CompareOptions::default()).unwrap();

    let milk = result.cheapest_products["Milk"].as_ref().unwrap();
    assert_eq!((milk.store.as_str(), milk.price), ("B", dec("1.50")));
    let bread = result.cheapest_products["Bread"].as_ref().unwrap();
    assert_eq!((bread.store.as_str(), bread.price), ("A", dec("2.00")));

    let totals: Vec<(&str, Decimal)> = result
        .total_costs
        .iter()
        .map(|(s, t)| (s.as_str(), *t))
        .collect();
    assert_eq!(totals, vec![("B", dec("1.50")), ("A", dec("2.00"))]);
    assert_eq!(result.cheapest_store, "B");
    assert_eq!(result.cheapest_price, dec("1.50"));
    assert_eq!(result.mode, TotalsMode::BestEffort);
    assert!(result.warnings.is_empty());
}

#[test]
fn milk_bread_scenario_full_basket_only() {
    let (a, b) = scenario_sources();
    let basket = Basket::new(["Milk", "Bread"]).unwrap();
    let options = CompareOptions {
        mode: TotalsMode::FullBasketOnly,
    };
    let result = global_cheapest_store(&[&a, &b], &basket, options).unwrap();

    assert_eq!(result.total_costs.len(), 1);
    assert_eq!(result.total_costs["A"], dec("4.00"));
    assert_eq!(result.cheapest_store, "A");
    assert_eq!(result.cheapest_price, dec("4.00"));
}

#[test]
fn duplicate_names_double_count() {
    let (a, b) = scenario_sources();
    let basket = Basket::new(["Milk", "Milk"]).unwrap();
    let result = global_cheapest_store(&[&a, &b], &basket, CompareOptions::default()).unwrap();

    assert_eq!(result.cheapest_products.len(), 1);
    assert_eq!(result.total_costs["B"], dec("3.00"));
    assert_eq!(result.cheapest_store, "B");
}

#[test]
fn no_matches_is_no_valid_totals() {
    let (a, b) = scenario_sources();
    let basket = Basket::new(["Caviar", "Truffle"]).unwrap();
    let err = global_cheapest_store(&[&a, &b], &basket, CompareOptions::default()).unwrap_err();
    assert_eq!(err, CompareError::NoValidTotals);
}

#[test]
fn full_basket_with_no_covering_store_is_no_valid_totals() {
    let (a, b) = scenario_sources();
    let basket = Basket::new(["Milk", "Caviar"]).unwrap();
    let options = CompareOptions {
        mode: TotalsMode::FullBasketOnly,
    };
    let err = global_cheapest_store(&[&a, &b], &basket, options).unwrap_err();
    assert_eq!(err, CompareError::NoValidTotals);
}

#[test]
fn all_sources_failing_is_empty_catalog() {
    let basket = Basket::new(["Milk"]).unwrap();
    let err =
        global_cheapest_store(&[&MissingFile], &basket, CompareOptions::default()).unwrap_err();
    assert_eq!(err, CompareError::EmptyCatalog);
}

#[test]
fn failed_source_is_excluded_and_reported() {
    let (a, b) = scenario_sources();
    let basket = Basket::new(["Milk", "Caviar"]).unwrap();
    let result =
        global_cheapest_store(&[&a, &MissingFile, &b], &basket, CompareOptions::default()).unwrap();

    assert_eq!(result.cheapest_store, "B");
    assert!(result.cheapest_products["Caviar"].is_none());
    assert!(matches!(
        result.warnings.as_slice(),
        [
            Warning::SourceUnavailable { source, .. },
            Warning::NoMatch { name },
        ] if source == "missing" && name == "Caviar"
    ));
}

#[test]
fn comparison_result_json_shape() {
    let (a, b) = scenario_sources();
    let basket = Basket::new(["Milk", "Bread"]).unwrap();
    let result = global_cheapest_store(&[&a, &b], &basket, CompareOptions::default()).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["cheapestStore"], "B");
    assert_eq!(json["cheapestPrice"].as_f64(), Some(1.5));
    assert_eq!(json["totalCosts"]["A"].as_f64(), Some(2.0));
    assert_eq!(json["cheapestProducts"]["Milk"]["store"], "B");
    assert_eq!(json["cheapestProducts"]["Milk"]["price"].as_f64(), Some(1.5));
    assert_eq!(json["mode"], "best_effort");
    assert!(json.get("warnings").is_none());
}

#[test]
fn breakdown_is_within_each_source() {
    let a = ListSource {
        label: "aldiBasket",
        records: vec![
            record("Aldi", "Milk", "2.00"),
            record("Aldi", "Milk", "1.80"),
            record("Aldi", "Bread", "2.50"),
        ],
    };
    let b = ListSource {
        label: "colesBasket",
        records: vec![record("Coles", "Milk", "1.50")],
    };
    let basket = Basket::new(["Milk", "Bread"]).unwrap();
    let breakdown = per_store_breakdown(&[&a, &b], &basket);

    let labels: Vec<&str> = breakdown.sources.keys().map(String::as_str).collect();
    assert_eq!(labels, vec!["aldiBasket", "colesBasket"]);

    let SourceBreakdown::Baskets(aldi) = &breakdown.sources["aldiBasket"] else {
        panic!("aldi should have loaded");
    };
    let names: Vec<(&str, Decimal)> = aldi["Aldi"]
        .iter()
        .map(|i| (i.name.as_str(), i.price))
        .collect();
    assert_eq!(names, vec![("Milk", dec("1.80")), ("Bread", dec("2.50"))]);

    let SourceBreakdown::Baskets(coles) = &breakdown.sources["colesBasket"] else {
        panic!("coles should have loaded");
    };
    assert_eq!(coles["Coles"].len(), 1);
    assert!(breakdown
        .warnings
        .iter()
        .any(|w| matches!(w, Warning::UngroupedMatch { name, .. } if name == "Bread")));
}

#[test]
fn breakdown_isolates_failed_source() {
    let (a, _) = scenario_sources();
    let basket = Basket::new(["Milk"]).unwrap();
    let breakdown = per_store_breakdown(&[&MissingFile, &a], &basket);

    assert!(matches!(
        &breakdown.sources["missing"],
        SourceBreakdown::Failed { error } if error.contains("no such file")
    ));
    assert!(matches!(&breakdown.sources["a"], SourceBreakdown::Baskets(_)));

    let json = serde_json::to_value(&breakdown).unwrap();
    assert!(json["missing"]["error"].is_string());
    assert_eq!(json["a"]["A"][0]["name"], "Milk");
    assert_eq!(json["a"]["A"][0]["price"].as_f64(), Some(2.0));
}

#[test]
fn breakdown_reports_corrupt_source_as_failed() {
    let corrupt = ListSource {
        label: "corrupt",
        records: vec![record("X", "Milk", "free")],
    };
    let basket = Basket::new(["Milk"]).unwrap();
    let breakdown = per_store_breakdown_fetched(fetch_all(&[&corrupt]), &basket);
    assert!(matches!(
        &breakdown.sources["corrupt"],
        SourceBreakdown::Failed { error } if error.contains("free")
    ));
}

#[test]
fn repeated_runs_are_identical() {
    let (a, b) = scenario_sources();
    let basket = Basket::new(["Bread", "Milk", "Eggs"]).unwrap();
    let first = global_cheapest_store(&[&a, &b], &basket, CompareOptions::default()).unwrap();
    let second = global_cheapest_store(&[&a, &b], &basket, CompareOptions::default()).unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
