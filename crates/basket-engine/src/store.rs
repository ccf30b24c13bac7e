//! Loading catalog sources into validated [`CatalogEntry`] lists.

use basket_core::{CatalogEntry, CatalogSource, EntryRejection, FetchedSource, SourceError};

use crate::Warning;

/// The validated entries of one source, in source order.
#[derive(Debug, Clone)]
pub struct SourceCatalog {
    pub label: String,
    pub entries: Vec<CatalogEntry>,
    pub warnings: Vec<Warning>,
}

/// Entries from every source that loaded, concatenated in source order.
#[derive(Debug, Clone, Default)]
pub struct LoadedCatalog {
    pub entries: Vec<CatalogEntry>,
    pub warnings: Vec<Warning>,
}

/// Fetches each source in order on the current thread.
#[must_use]
pub fn fetch_all(sources: &[&dyn CatalogSource]) -> Vec<FetchedSource> {
    sources.iter().map(|s| FetchedSource::fetch(*s)).collect()
}

/// Validates the records of one fetched source.
///
/// Records missing a product, price or store are dropped and reported as
/// [`Warning::MalformedEntry`]. A price that is present but not a
/// non-negative number marks the source as corrupt.
///
/// # Errors
///
/// Returns the fetch error unchanged, or [`SourceError::InvalidPrice`] for a
/// corrupt price.
pub fn load_source(fetched: FetchedSource) -> Result<SourceCatalog, SourceError> {
    let FetchedSource {
        label,
        default_store,
        records,
    } = fetched;
    let records = records?;

    let mut entries = Vec::with_capacity(records.len());
    let mut warnings = Vec::new();

    for (position, record) in records.into_iter().enumerate() {
        let product = record.product.clone().unwrap_or_default();
        match CatalogEntry::from_raw(record, default_store.as_deref()) {
            Ok(entry) => entries.push(entry),
            Err(EntryRejection::InvalidPrice { raw }) => {
                return Err(SourceError::InvalidPrice {
                    label,
                    product,
                    raw,
                });
            }
            Err(rejection @ EntryRejection::Missing(_)) => {
                tracing::warn!(
                    source = %label,
                    position,
                    product = %product,
                    reason = %rejection,
                    "dropping malformed catalog entry"
                );
                warnings.push(Warning::MalformedEntry {
                    source: label.clone(),
                    position,
                    product,
                    reason: rejection.to_string(),
                });
            }
        }
    }

    tracing::debug!(source = %label, entries = entries.len(), "catalog source loaded");

    Ok(SourceCatalog {
        label,
        entries,
        warnings,
    })
}

/// Loads every fetched source and concatenates the entries.
///
/// Source order is preserved, and each source keeps its internal order, so
/// earlier sources win price ties. A failed source is reported as
/// [`Warning::SourceUnavailable`] and contributes nothing.
#[must_use]
pub fn load_catalog(fetched: Vec<FetchedSource>) -> LoadedCatalog {
    let mut catalog = LoadedCatalog::default();

    for source in fetched {
        let label = source.label.clone();
        match load_source(source) {
            Ok(loaded) => {
                catalog.entries.extend(loaded.entries);
                catalog.warnings.extend(loaded.warnings);
            }
            Err(e) => {
                tracing::warn!(source = %label, error = %e, "excluding catalog source");
                catalog.warnings.push(Warning::SourceUnavailable {
                    source: label,
                    reason: e.to_string(),
                });
            }
        }
    }

    catalog
}
