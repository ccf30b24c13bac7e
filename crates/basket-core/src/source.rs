//! The seam between catalog ingestion and the comparison engine.

use thiserror::Error;

use crate::RawCatalogRecord;

/// A source of raw catalog records: a listing file, parsed promotion text, a
/// table export.
///
/// Fetching must not touch shared mutable state, so independent sources can
/// be fetched on separate threads.
pub trait CatalogSource: Send + Sync {
    /// Stable, human-readable name of the source (e.g. `"Coles"`).
    fn label(&self) -> &str;

    /// Store name applied to records that do not carry one.
    fn default_store(&self) -> Option<&str> {
        None
    }

    /// Reads every record the source currently holds, in source order.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the source as a whole cannot be read.
    fn fetch(&self) -> Result<Vec<RawCatalogRecord>, SourceError>;
}

/// Per-source failures. None of these abort a comparison run; the failing
/// source is excluded and reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("source {label} unavailable: {reason}")]
    Unavailable { label: String, reason: String },

    #[error("source {label} has corrupt price '{raw}' for product '{product}'")]
    InvalidPrice {
        label: String,
        product: String,
        raw: String,
    },

    #[error("source {label} timed out after {secs}s")]
    Timeout { label: String, secs: u64 },
}

/// The outcome of fetching one source, kept together with its label and
/// default store so the engine can validate and attribute the records.
#[derive(Debug, Clone)]
pub struct FetchedSource {
    pub label: String,
    pub default_store: Option<String>,
    pub records: Result<Vec<RawCatalogRecord>, SourceError>,
}

impl FetchedSource {
    /// Fetches `source` synchronously on the current thread.
    #[must_use]
    pub fn fetch(source: &dyn CatalogSource) -> Self {
        let records = source.fetch();
        if let Err(e) = &records {
            tracing::warn!(source = source.label(), error = %e, "catalog source fetch failed");
        }
        Self {
            label: source.label().to_string(),
            default_store: source.default_store().map(ToOwned::to_owned),
            records,
        }
    }

    /// A successful fetch from already-materialized records.
    #[must_use]
    pub fn ok(
        label: impl Into<String>,
        default_store: Option<&str>,
        records: Vec<RawCatalogRecord>,
    ) -> Self {
        Self {
            label: label.into(),
            default_store: default_store.map(ToOwned::to_owned),
            records: Ok(records),
        }
    }

    /// A failed fetch.
    #[must_use]
    pub fn failed(label: impl Into<String>, error: SourceError) -> Self {
        Self {
            label: label.into(),
            default_store: None,
            records: Err(error),
        }
    }
}
