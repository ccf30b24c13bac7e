use std::path::{Path, PathBuf};

use basket_core::{CatalogSource, RawCatalogRecord, SourceError};

use crate::read_records_json;

/// A retailer listing file: a JSON array of
/// `{store?, product, brand?, price?, quantity?}` objects.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    label: String,
    store: Option<String>,
    path: PathBuf,
}

impl JsonFileSource {
    #[must_use]
    pub fn new(label: &str, store: Option<&str>, path: &Path) -> Self {
        Self {
            label: label.to_string(),
            store: store.map(ToOwned::to_owned),
            path: path.to_path_buf(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for JsonFileSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn default_store(&self) -> Option<&str> {
        self.store.as_deref()
    }

    fn fetch(&self) -> Result<Vec<RawCatalogRecord>, SourceError> {
        let records =
            read_records_json(&self.path).map_err(|e| e.into_source_error(&self.label))?;
        tracing::debug!(source = %self.label, records = records.len(), "read json catalog");
        Ok(records)
    }
}
