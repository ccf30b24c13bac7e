use std::path::Path;

use basket_core::RawCatalogRecord;

use crate::IngestError;

/// Reads a JSON array of raw catalog records.
///
/// # Errors
///
/// Returns [`IngestError::Read`] or [`IngestError::Json`].
pub fn read_records_json(path: &Path) -> Result<Vec<RawCatalogRecord>, IngestError> {
    let content = std::fs::read_to_string(path).map_err(|source| IngestError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| IngestError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Writes records as a pretty-printed JSON array, replacing any existing file.
///
/// # Errors
///
/// Returns [`IngestError::Write`] or [`IngestError::Json`].
pub fn write_records_json(path: &Path, records: &[RawCatalogRecord]) -> Result<(), IngestError> {
    let json = serde_json::to_string_pretty(records).map_err(|source| IngestError::Json {
        path: path.display().to_string(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| IngestError::Write {
        path: path.display().to_string(),
        source,
    })?;
    tracing::info!(path = %path.display(), records = records.len(), "wrote catalog records");
    Ok(())
}
