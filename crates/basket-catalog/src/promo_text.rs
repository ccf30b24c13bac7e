//! Keyword / next-line extraction of listings from promotion or receipt text.
//!
//! Catalogue PDFs flatten to lines where a product name is followed by a line
//! carrying its price and pack size:
//!
//! ```text
//! Coles RSPCA Approved Chicken Breast Fillets
//! $11.00 per kg
//! ```
//!
//! A line containing a keyword is split on `,`, `;` and `|`. Every part that
//! contains a keyword becomes one record, priced from the following line.

use std::sync::LazyLock;

use basket_core::{RawCatalogRecord, RawPrice};
use regex::Regex;

static PART_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;|]").expect("valid regex"));

static PRICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\d+(?:\.\d{1,2})?").expect("valid regex"));

static QUANTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d+(?:\.\d+)?\s*(?:kg|g|ml|l|each|pack)\b|\bper\s+[a-z][a-z0-9 ]*|\beach\b")
        .expect("valid regex")
});

/// Extracts raw catalog records from promotion text.
///
/// `keywords` must already be lowercased. Records carry `store` when given,
/// otherwise none (the source's default store applies later). A product line
/// with no following line is ignored; a following line without a price gives
/// a record with no price, which the engine drops as malformed.
#[must_use]
pub fn parse_promotion_text(
    text: &str,
    store: Option<&str>,
    keywords: &[String],
) -> Vec<RawCatalogRecord> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let mut records = Vec::new();

    for pair in lines.windows(2) {
        let (product_line, detail_line) = (pair[0], pair[1]);
        if !contains_keyword(product_line, keywords) {
            continue;
        }

        let (price, quantity) = price_and_quantity(detail_line);
        for part in PART_SEPARATOR.split(product_line).map(str::trim) {
            if !contains_keyword(part, keywords) {
                continue;
            }
            records.push(RawCatalogRecord {
                store: store.map(ToOwned::to_owned),
                product: Some(part.to_string()),
                brand: None,
                price: price.clone(),
                quantity: quantity.clone(),
            });
        }
    }

    tracing::debug!(records = records.len(), "parsed promotion text");
    records
}

fn contains_keyword(text: &str, keywords: &[String]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|k| lower.contains(k.as_str()))
}

/// Price and quantity from a detail line. When several parts carry one, the
/// last part wins.
fn price_and_quantity(line: &str) -> (Option<RawPrice>, Option<String>) {
    let mut price = None;
    let mut quantity = None;

    for part in PART_SEPARATOR.split(line) {
        if let Some(m) = PRICE.find(part) {
            price = Some(to_raw_price(m.as_str()));
        }
        let without_price = PRICE.replace_all(part, " ");
        if let Some(m) = QUANTITY.find(&without_price) {
            quantity = Some(m.as_str().trim().to_string());
        }
    }

    (price, quantity)
}

fn to_raw_price(matched: &str) -> RawPrice {
    let digits = matched.trim_start_matches('$');
    digits
        .parse::<serde_json::Number>()
        .map_or_else(|_| RawPrice::Text(digits.to_string()), RawPrice::Number)
}

#[cfg(test)]
#[path = "promo_text_test.rs"]
mod tests;
