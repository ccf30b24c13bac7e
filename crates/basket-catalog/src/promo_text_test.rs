use basket_core::CatalogEntry;
use rust_decimal::Decimal;

use super::*;

fn keywords(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

fn entries(records: Vec<RawCatalogRecord>) -> Vec<CatalogEntry> {
    records
        .into_iter()
        .map(|r| CatalogEntry::from_raw(r, Some("Coles")).unwrap())
        .collect()
}

#[test]
fn product_line_priced_from_next_line() {
    let text = "Weekly specials\nMilk\n$1.80 2L\nBread\n$3.20 700g\n";
    let records = parse_promotion_text(text, None, &keywords(&["milk", "bread"]));
    let parsed = entries(records);

    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].product, "Milk");
    assert_eq!(parsed[0].price, Decimal::new(180, 2));
    assert_eq!(parsed[0].quantity, "2L");
    assert_eq!(parsed[0].brand, "Unknown");
    assert_eq!(parsed[1].product, "Bread");
    assert_eq!(parsed[1].quantity, "700g");
}

#[test]
fn per_unit_and_each_quantities() {
    let text = "Chicken Thigh Fillets\n$6.00 per kg\nPink Lady Apples\n$0.80 each";
    let parsed = entries(parse_promotion_text(
        text,
        None,
        &keywords(&["chicken", "apples"]),
    ));
    assert_eq!(parsed[0].quantity, "per kg");
    assert_eq!(parsed[0].price, Decimal::new(6, 0));
    assert_eq!(parsed[1].quantity, "each");
}

#[test]
fn keyword_match_is_case_insensitive_substring() {
    let text = "COLES BEEF SAUSAGES\n$5.50 500g";
    let records = parse_promotion_text(text, Some("Coles"), &keywords(&["sausages"]));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].product.as_deref(), Some("COLES BEEF SAUSAGES"));
    assert_eq!(records[0].store.as_deref(), Some("Coles"));
}

#[test]
fn multi_product_line_yields_one_record_per_keyword_part() {
    let text = "Lamb Chops, Beef Steak | Frozen Peas\n$12.00 1kg";
    let records = parse_promotion_text(text, None, &keywords(&["lamb", "steak"]));
    let names: Vec<&str> = records.iter().filter_map(|r| r.product.as_deref()).collect();
    assert_eq!(names, vec!["Lamb Chops", "Beef Steak"]);
    assert!(records.iter().all(|r| r.quantity.as_deref() == Some("1kg")));
}

#[test]
fn last_price_on_detail_line_wins() {
    let text = "Bacon\nwas $9.00, now $7.50 250g";
    let records = parse_promotion_text(text, None, &keywords(&["bacon"]));
    let entry = CatalogEntry::from_raw(records[0].clone(), Some("Coles")).unwrap();
    assert_eq!(entry.price, Decimal::new(750, 2));
    assert_eq!(entry.quantity, "250g");
}

#[test]
fn detail_line_without_price_leaves_price_absent() {
    let text = "Celery\nfresh from the farm";
    let records = parse_promotion_text(text, None, &keywords(&["celery"]));
    assert_eq!(records.len(), 1);
    assert!(records[0].price.is_none());
    assert!(records[0].quantity.is_none());
}

#[test]
fn trailing_product_line_is_ignored() {
    let text = "$2.00\nBroccoli";
    let records = parse_promotion_text(text, None, &keywords(&["broccoli"]));
    assert!(records.is_empty());
}

#[test]
fn lines_without_keywords_produce_nothing() {
    let text = "Catalogue valid Wed 18 Sep\n$1.00 each";
    assert!(parse_promotion_text(text, None, &keywords(&["milk"])).is_empty());
}
