use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// How a retailer's catalog file is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// A JSON array of catalog records.
    Json,
    /// Plain text extracted from a promotional catalogue or receipt.
    Text,
    /// The `products` table of a SQLite database filled by `ingest --db`.
    Table,
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Json => write!(f, "json"),
            SourceFormat::Text => write!(f, "text"),
            SourceFormat::Table => write!(f, "table"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetailerConfig {
    /// Key used in breakdown output, e.g. `"colesBasket"` or `"Coles"`.
    pub label: String,
    /// Store name attached to records that do not name one.
    pub store: String,
    pub path: PathBuf,
    pub format: SourceFormat,
    /// Keywords for text sources; the built-in list is used when empty.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl RetailerConfig {
    /// Resolves `path` against the directory holding the retailers file.
    #[must_use]
    pub fn resolved_path(&self, base_dir: &Path) -> PathBuf {
        if self.path.is_absolute() {
            self.path.clone()
        } else {
            base_dir.join(&self.path)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RetailersFile {
    pub retailers: Vec<RetailerConfig>,
}

/// Load and validate the retailer configuration from a YAML file.
///
/// Relative catalog paths are rewritten to be relative to the YAML file's
/// directory.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_retailers(path: &Path) -> Result<RetailersFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RetailersFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut file: RetailersFile =
        serde_yaml::from_str(&content).map_err(ConfigError::RetailersFileParse)?;

    validate_retailers(&file)?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    for retailer in &mut file.retailers {
        retailer.path = retailer.resolved_path(base_dir);
    }

    Ok(file)
}

fn validate_retailers(file: &RetailersFile) -> Result<(), ConfigError> {
    if file.retailers.is_empty() {
        return Err(ConfigError::Validation(
            "at least one retailer must be configured".to_string(),
        ));
    }

    let mut seen_labels = HashSet::new();

    for retailer in &file.retailers {
        if retailer.label.trim().is_empty() {
            return Err(ConfigError::Validation(
                "retailer label must be non-empty".to_string(),
            ));
        }

        if retailer.store.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "retailer '{}' must name a store",
                retailer.label
            )));
        }

        if retailer.path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(format!(
                "retailer '{}' must have a catalog path",
                retailer.label
            )));
        }

        if !seen_labels.insert(retailer.label.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate retailer label: '{}'",
                retailer.label
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "retailers_test.rs"]
mod tests;
