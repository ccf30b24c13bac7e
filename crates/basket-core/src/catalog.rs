//! Catalog listings: the raw ingestion-boundary record and the validated
//! [`CatalogEntry`] the comparison engine works with.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EntryRejection;

/// Placeholder for a brand or quantity the source did not provide.
pub const UNKNOWN: &str = "Unknown";

/// One observed price point for a product at a store.
///
/// Entries are only built through [`CatalogEntry::from_raw`] (or the
/// constructor in tests), so `price` is always present and non-negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub store: String,
    pub product: String,
    pub brand: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: String,
}

impl CatalogEntry {
    /// Builds an entry with `"Unknown"` brand and quantity.
    #[must_use]
    pub fn new(store: impl Into<String>, product: impl Into<String>, price: Decimal) -> Self {
        Self {
            store: store.into(),
            product: product.into(),
            brand: UNKNOWN.to_string(),
            price,
            quantity: UNKNOWN.to_string(),
        }
    }

    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    #[must_use]
    pub fn with_quantity(mut self, quantity: impl Into<String>) -> Self {
        self.quantity = quantity.into();
        self
    }

    /// Lowercased product name used for case-insensitive equality matching.
    #[must_use]
    pub fn product_key(&self) -> String {
        self.product.to_lowercase()
    }

    /// Validates a raw record into an entry.
    ///
    /// `default_store` is used when the record carries no store of its own
    /// (receipt and promotion text rarely name the retailer on every line).
    ///
    /// # Errors
    ///
    /// Returns [`EntryRejection::Missing`] when the product, price or store is
    /// absent, and [`EntryRejection::InvalidPrice`] when the price is present
    /// but not a non-negative amount.
    pub fn from_raw(
        record: RawCatalogRecord,
        default_store: Option<&str>,
    ) -> Result<Self, EntryRejection> {
        let product = non_blank(record.product).ok_or(EntryRejection::Missing("product"))?;
        let raw_price = record.price.ok_or(EntryRejection::Missing("price"))?;
        let price = raw_price.to_decimal()?;

        let store = non_blank(record.store)
            .or_else(|| non_blank(default_store.map(ToOwned::to_owned)))
            .ok_or(EntryRejection::Missing("store"))?;

        Ok(Self {
            store,
            product,
            brand: non_blank(record.brand).unwrap_or_else(|| UNKNOWN.to_string()),
            price,
            quantity: non_blank(record.quantity).unwrap_or_else(|| UNKNOWN.to_string()),
        })
    }
}

/// A listing exactly as a source produced it. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCatalogRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub price: Option<RawPrice>,
    #[serde(default)]
    pub quantity: Option<String>,
}

/// A price as it appeared in the source: a JSON number or a text amount such
/// as `"$3.50"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Number(serde_json::Number),
    Text(String),
}

impl RawPrice {
    /// Converts to a non-negative [`Decimal`].
    ///
    /// # Errors
    ///
    /// Returns [`EntryRejection::InvalidPrice`] for non-numeric text or a
    /// negative amount.
    pub fn to_decimal(&self) -> Result<Decimal, EntryRejection> {
        let raw = match self {
            RawPrice::Number(n) => n.to_string(),
            RawPrice::Text(t) => t.clone(),
        };
        let cleaned = raw.trim().trim_start_matches('$').replace(',', "");

        let value = Decimal::from_str(&cleaned)
            .or_else(|_| Decimal::from_scientific(&cleaned))
            .map_err(|_| EntryRejection::InvalidPrice { raw: raw.clone() })?;

        if value.is_sign_negative() && !value.is_zero() {
            return Err(EntryRejection::InvalidPrice { raw });
        }
        Ok(value.normalize())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
